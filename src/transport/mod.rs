// src/transport/mod.rs
//! Device transport - the HTTP seam between the acquisition handler and the device

mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CommandReply, ControlCommand, Reading, RollingHistory};

pub use http::HttpTransport;

/// Requests the acquisition handler makes against a device
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// `GET /data`
    async fn fetch_reading(&self) -> Result<Reading>;

    /// `GET /history`
    async fn fetch_history(&self) -> Result<RollingHistory>;

    /// `POST /control` with `{action, value?}`
    async fn send_control(&self, command: &ControlCommand) -> Result<CommandReply>;

    /// `POST /calibrate`, plain-text reply
    async fn calibrate(&self) -> Result<CommandReply>;

    /// `POST /restart`
    async fn restart(&self) -> Result<CommandReply>;
}
