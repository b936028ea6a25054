// src/modules/telemetry/handler/mod.rs
mod new;
mod acquire;
mod commands;
mod start;
mod snapshot;

use std::sync::{
    atomic::{AtomicU32, AtomicU64},
    Arc, Mutex,
};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    config::{AcquisitionMode, TelemetryConfig},
    simulation::Simulator,
    transport::DeviceTransport,
    types::TelemetrySnapshot,
};

pub use acquire::STALE_STREAK_LIMIT;
pub use start::AcquisitionTask;

/// Produces a continuously refreshed view of one device, either by polling
/// its HTTP API or by synthesizing readings locally.
///
/// Each handler exclusively owns its reading, history and connection state;
/// consumers only see immutable [`TelemetrySnapshot`]s.
pub struct TelemetryHandler {
    config: TelemetryConfig,
    mode: AcquisitionMode,
    transport: Option<Arc<dyn DeviceTransport>>,
    simulator: Mutex<Simulator>,
    // Current snapshot lives in the channel; every update replaces it wholesale
    snapshot_tx: watch::Sender<Arc<TelemetrySnapshot>>,
    // Sequence number of the most recently dispatched attempt
    dispatched: AtomicU64,
    // Responses discarded in a row because a newer attempt was already out
    stale_streak: AtomicU32,
    shutdown: CancellationToken,
}
