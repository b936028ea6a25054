use std::sync::Arc;

use tokio::sync::watch;

use crate::{config::AcquisitionMode, types::TelemetrySnapshot};

use super::TelemetryHandler;

impl TelemetryHandler {
    pub fn snapshot(&self) -> Arc<TelemetrySnapshot> {
        self.snapshot_tx.borrow().clone()
    }

    /// Receiver that is notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<Arc<TelemetrySnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn mode(&self) -> &AcquisitionMode {
        &self.mode
    }

    pub fn is_simulated(&self) -> bool {
        self.mode == AcquisitionMode::Simulation
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}
