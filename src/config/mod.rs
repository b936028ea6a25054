// src/config/mod.rs
mod validation;

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::{log_info, log_warn};

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 3000;

/// Acquisition settings, passed once at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Base URL of the device HTTP API, e.g. `http://192.168.1.103`
    #[serde(default)]
    pub device_address: Option<String>,

    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Absent means simulation
    #[serde(default)]
    pub simulation_mode: Option<bool>,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

/// Where readings come from, resolved from [`TelemetryConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionMode {
    Simulation,
    Live { base_url: String },
}

fn default_refresh_interval_ms() -> u64 {
    DEFAULT_REFRESH_INTERVAL_MS
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            device_address: None,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            simulation_mode: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            log_dir: default_log_dir(),
        }
    }
}

impl TelemetryConfig {
    /// Live-mode config for the given device
    pub fn live(device_address: impl Into<String>) -> Self {
        Self {
            device_address: Some(device_address.into()),
            simulation_mode: Some(false),
            ..Self::default()
        }
    }

    pub fn simulation() -> Self {
        Self {
            simulation_mode: Some(true),
            ..Self::default()
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: TelemetryConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Try each path in order, falling back to defaults
    pub fn load_or_default(paths: &[PathBuf]) -> Self {
        for path in paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        log_info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        log_warn!("Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        log_warn!("No config file found - using defaults (simulation mode)");
        Self::default()
    }

    pub fn mode(&self) -> AcquisitionMode {
        if self.simulation_mode.unwrap_or(true) {
            return AcquisitionMode::Simulation;
        }

        match self.device_address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => AcquisitionMode::Live {
                base_url: address.trim_end_matches('/').to_string(),
            },
            _ => AcquisitionMode::Simulation,
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_resolve_to_simulation() {
        let config = TelemetryConfig::from_yaml("{}").unwrap();

        assert_eq!(config.refresh_interval_ms, 2000);
        assert_eq!(config.simulation_mode, None);
        assert_eq!(config.mode(), AcquisitionMode::Simulation);
    }

    #[test]
    fn test_address_without_flag_stays_simulated() {
        let yaml = r#"
device_address: "http://192.168.1.103"
"#;
        let config = TelemetryConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.mode(), AcquisitionMode::Simulation);
    }

    #[test]
    fn test_live_mode() {
        let yaml = r#"
device_address: "http://device.local/"
simulation_mode: false
refresh_interval_ms: 5000
"#;
        let config = TelemetryConfig::from_yaml(yaml).unwrap();

        assert_eq!(
            config.mode(),
            AcquisitionMode::Live { base_url: "http://device.local".to_string() }
        );
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_empty_address_forces_simulation() {
        let mut config = TelemetryConfig::live("");
        assert_eq!(config.mode(), AcquisitionMode::Simulation);

        config.device_address = None;
        assert_eq!(config.mode(), AcquisitionMode::Simulation);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "device_address: \"http://10.0.0.5\"").unwrap();
        writeln!(file, "simulation_mode: false").unwrap();

        let config = TelemetryConfig::load(file.path()).unwrap();
        assert_eq!(config.device_address.as_deref(), Some("http://10.0.0.5"));
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn test_load_or_default_skips_missing_and_broken_files() {
        let mut broken = NamedTempFile::new().unwrap();
        writeln!(broken, "refresh_interval_ms: [not a number").unwrap();

        let paths = vec![
            PathBuf::from("/nonexistent/telemetry.yaml"),
            broken.path().to_path_buf(),
        ];
        let config = TelemetryConfig::load_or_default(&paths);
        assert_eq!(config, TelemetryConfig::default());
    }
}
