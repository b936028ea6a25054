pub mod handler;

pub use handler::{AcquisitionTask, TelemetryHandler, STALE_STREAK_LIMIT};
