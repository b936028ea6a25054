// src/types/reading.rs
use serde::{Deserialize, Serialize};

use crate::error::{Result, TelemetryError};

/// Device health classification reported alongside every reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    Normal,
    Degraded,
    Critical,
}

impl HealthState {
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(HealthState::Normal),
            1 => Some(HealthState::Degraded),
            2 => Some(HealthState::Critical),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            HealthState::Normal => 0,
            HealthState::Degraded => 1,
            HealthState::Critical => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthState::Normal => "Normal",
            HealthState::Degraded => "Degraded",
            HealthState::Critical => "Critical",
        }
    }

    /// Severity class used by the view layer for styling
    pub fn class(&self) -> &'static str {
        match self {
            HealthState::Normal => "normal",
            HealthState::Degraded => "degraded",
            HealthState::Critical => "critical",
        }
    }
}

/// Recent pressure direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherTrend {
    Stable,
    Rising,
    Falling,
}

impl WeatherTrend {
    pub const ALL: [WeatherTrend; 3] = [WeatherTrend::Stable, WeatherTrend::Rising, WeatherTrend::Falling];

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            WeatherTrend::Stable => 0,
            WeatherTrend::Rising => 1,
            WeatherTrend::Falling => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherTrend::Stable => "Stable",
            WeatherTrend::Rising => "Rising",
            WeatherTrend::Falling => "Falling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerProfile {
    Performance,
    Balanced,
    UltraLowPower,
}

impl PowerProfile {
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(PowerProfile::Performance),
            1 => Some(PowerProfile::Balanced),
            2 => Some(PowerProfile::UltraLowPower),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            PowerProfile::Performance => 0,
            PowerProfile::Balanced => 1,
            PowerProfile::UltraLowPower => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerProfile::Performance => "Performance",
            PowerProfile::Balanced => "Balanced",
            PowerProfile::UltraLowPower => "Ultra Low Power",
        }
    }
}

/// One complete sensor/system snapshot, in the device's JSON layout.
///
/// Payloads coming off the wire go through [`Reading::normalize`] before
/// anything else sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    // Physical measurements
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub altitude: f64,

    // Power
    pub battery: f64,
    pub battery_percent: f64,

    // System
    pub free_heap: f64,
    pub heap_percent: f64,
    pub cpu_load: f64,
    pub wifi_rssi: f64,
    pub wifi_quality: f64,
    pub uptime: u64,

    pub health: u8,
    pub health_text: String,
    pub health_class: String,

    pub trend: u8,
    pub trend_text: String,
    pub pressure_rate: f64,

    pub profile: u8,
    pub profile_name: String,
    pub runtime_text: String,

    // Sensor subsystem validity
    pub dht_valid: bool,
    pub bmp_valid: bool,
}

impl Reading {
    pub fn health_state(&self) -> Option<HealthState> {
        HealthState::from_ordinal(self.health)
    }

    pub fn weather_trend(&self) -> Option<WeatherTrend> {
        WeatherTrend::from_ordinal(self.trend)
    }

    pub fn power_profile(&self) -> Option<PowerProfile> {
        PowerProfile::from_ordinal(self.profile)
    }

    pub fn set_health(&mut self, health: HealthState) {
        self.health = health.ordinal();
        self.health_text = health.label().to_string();
        self.health_class = health.class().to_string();
    }

    pub fn set_trend(&mut self, trend: WeatherTrend) {
        self.trend = trend.ordinal();
        self.trend_text = trend.label().to_string();
    }

    pub fn set_profile(&mut self, profile: PowerProfile) {
        self.profile = profile.ordinal();
        self.profile_name = profile.label().to_string();
    }

    /// Enforce the reading invariants on a device payload.
    ///
    /// Non-finite numbers and unknown ordinals reject the payload; percent
    /// fields are clamped and labels are rewritten from their ordinals.
    pub fn normalize(mut self) -> Result<Self> {
        let numerics = [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("pressure", self.pressure),
            ("altitude", self.altitude),
            ("battery", self.battery),
            ("battery_percent", self.battery_percent),
            ("free_heap", self.free_heap),
            ("heap_percent", self.heap_percent),
            ("cpu_load", self.cpu_load),
            ("wifi_rssi", self.wifi_rssi),
            ("wifi_quality", self.wifi_quality),
            ("pressure_rate", self.pressure_rate),
        ];
        if let Some((name, _)) = numerics.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TelemetryError::Malformed(format!("{} is not a finite number", name)));
        }

        let health = self.health_state().ok_or_else(|| {
            TelemetryError::Malformed(format!("unknown health ordinal {}", self.health))
        })?;
        let trend = self.weather_trend().ok_or_else(|| {
            TelemetryError::Malformed(format!("unknown trend ordinal {}", self.trend))
        })?;
        let profile = self.power_profile().ok_or_else(|| {
            TelemetryError::Malformed(format!("unknown profile ordinal {}", self.profile))
        })?;

        self.humidity = clamp_percent(self.humidity);
        self.battery_percent = clamp_percent(self.battery_percent);
        self.heap_percent = clamp_percent(self.heap_percent);
        self.cpu_load = clamp_percent(self.cpu_load);
        self.wifi_quality = clamp_percent(self.wifi_quality);

        self.set_health(health);
        self.set_trend(trend);
        self.set_profile(profile);

        Ok(self)
    }
}

pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
