// src/config/validation.rs
use reqwest::Url;

use crate::config::TelemetryConfig;
use crate::error::{Result, TelemetryError};

impl TelemetryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_ms == 0 {
            return Err("refresh_interval_ms must be greater than zero".into());
        }

        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be greater than zero".into());
        }

        if let Some(address) = self.device_address.as_deref().map(str::trim) {
            if !address.is_empty() {
                let url = Url::parse(address).map_err(|e| {
                    TelemetryError::Config(format!("invalid device_address '{}': {}", address, e))
                })?;

                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(TelemetryError::Config(format!(
                        "device_address must use http or https, got '{}'",
                        url.scheme()
                    )));
                }
            }
        }

        Ok(())
    }
}
