// src/types/snapshot.rs
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::types::{history::RollingHistory, reading::Reading};

/// Immutable view of the acquisition state handed to consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub data: Option<Reading>,
    pub history: Option<RollingHistory>,
    pub is_connected: bool,
    /// True only until the first acquisition attempt completes
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_update: Option<DateTime<Local>>,
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            data: None,
            history: None,
            is_connected: false,
            is_loading: true,
            error: None,
            last_update: None,
        }
    }
}
