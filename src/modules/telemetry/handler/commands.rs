use crate::{
    log_info, log_warn,
    types::{CommandOutcome, ControlCommand, PowerProfile},
};

use super::TelemetryHandler;

impl TelemetryHandler {
    /// Sends `{action, value?}` to the device control endpoint.
    ///
    /// Simulation mode reports success without contacting anything. Live mode
    /// makes exactly one request; success means an HTTP success status.
    pub async fn dispatch_command(&self, action: &str, value: Option<f64>) -> CommandOutcome {
        self.send_control(ControlCommand::new(action, value)).await
    }

    pub async fn set_profile(&self, profile: PowerProfile) -> CommandOutcome {
        self.send_control(ControlCommand::set_profile(profile)).await
    }

    pub async fn toggle_oled(&self) -> CommandOutcome {
        self.send_control(ControlCommand::toggle_oled()).await
    }

    pub async fn send_control(&self, command: ControlCommand) -> CommandOutcome {
        let Some(transport) = self.live_transport() else {
            return CommandOutcome::ok();
        };

        log_info!("Sending command '{}' (value={:?})", command.action, command.value);

        match transport.send_control(&command).await {
            Ok(reply) if reply.ok => CommandOutcome::ok(),
            Ok(reply) => {
                log_warn!("Command '{}' rejected by device", command.action);
                CommandOutcome::failed(
                    reply.body.unwrap_or_else(|| format!("Device rejected '{}'", command.action)),
                )
            }
            Err(e) => {
                log_warn!("Command '{}' failed: {}", command.action, e);
                CommandOutcome::failed(e.to_string())
            }
        }
    }

    /// Zero-reference reset on the device. Does not wait for the device afterwards.
    pub async fn calibrate(&self) -> CommandOutcome {
        let Some(transport) = self.live_transport() else {
            return CommandOutcome::ok_with("Demo calibration");
        };

        log_info!("Requesting calibration");

        match transport.calibrate().await {
            Ok(reply) => CommandOutcome {
                success: reply.ok,
                message: reply.body,
            },
            Err(e) => {
                log_warn!("Calibration failed: {}", e);
                CommandOutcome::failed(format!("Calibration failed: {}", e))
            }
        }
    }

    /// Reboots the device. Does not wait for the device to come back.
    pub async fn restart(&self) -> CommandOutcome {
        let Some(transport) = self.live_transport() else {
            return CommandOutcome::ok();
        };

        log_info!("Requesting device restart");

        match transport.restart().await {
            Ok(reply) if reply.ok => CommandOutcome::ok(),
            Ok(_) => CommandOutcome::failed("Device rejected restart"),
            Err(e) => {
                log_warn!("Restart failed: {}", e);
                CommandOutcome::failed(format!("Restart failed: {}", e))
            }
        }
    }
}
