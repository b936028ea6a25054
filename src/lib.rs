pub mod config;
pub mod error;
pub mod modules;
pub mod simulation;
pub mod transport;
pub mod types;
pub mod util;

pub use config::{AcquisitionMode, TelemetryConfig};
pub use modules::telemetry::{AcquisitionTask, TelemetryHandler, STALE_STREAK_LIMIT};
