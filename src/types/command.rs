// src/types/command.rs
use serde::{Deserialize, Serialize};

use crate::types::reading::PowerProfile;

/// Body of `POST /control`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlCommand {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl ControlCommand {
    pub fn new(action: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            action: action.into(),
            value,
        }
    }

    pub fn set_profile(profile: PowerProfile) -> Self {
        Self::new("profile", Some(profile.ordinal() as f64))
    }

    pub fn toggle_oled() -> Self {
        Self::new("oled_toggle", None)
    }
}

/// What the device answered to a command request
#[derive(Debug, Clone, PartialEq)]
pub struct CommandReply {
    /// HTTP success status
    pub ok: bool,
    pub body: Option<String>,
}

/// Result handed back to the caller of every command. Never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandOutcome {
    pub fn ok() -> Self {
        Self { success: true, message: None }
    }

    pub fn ok_with(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()) }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_body_omits_missing_value() {
        let body = serde_json::to_value(ControlCommand::toggle_oled()).unwrap();
        assert_eq!(body, serde_json::json!({"action": "oled_toggle"}));
    }

    #[test]
    fn test_profile_command_carries_ordinal() {
        let body = serde_json::to_value(ControlCommand::set_profile(PowerProfile::UltraLowPower)).unwrap();
        assert_eq!(body, serde_json::json!({"action": "profile", "value": 2.0}));
    }
}
