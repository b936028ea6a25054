pub mod command;
pub mod history;
pub mod reading;
pub mod snapshot;

pub use command::{CommandOutcome, CommandReply, ControlCommand};
pub use history::{RollingHistory, HISTORY_CAPACITY};
pub use reading::{HealthState, PowerProfile, Reading, WeatherTrend};
pub use snapshot::TelemetrySnapshot;
