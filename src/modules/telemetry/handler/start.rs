use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{log_debug, log_info};

use super::TelemetryHandler;

/// Running acquisition schedule. Stopping it (or dropping it) tears the
/// handler down: no attempt fires or applies afterwards.
#[derive(Debug)]
pub struct AcquisitionTask {
    shutdown: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl AcquisitionTask {
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
        log_info!("Acquisition schedule stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled()
    }
}

impl Drop for AcquisitionTask {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

impl TelemetryHandler {
    /// Acquire now, then once per refresh interval. Must be called inside a tokio runtime.
    ///
    /// Every tick spawns its own attempt, so a slow device can leave several in
    /// flight; only the latest one is allowed to update state.
    pub fn start(self: &Arc<Self>) -> AcquisitionTask {
        let handler = Arc::clone(self);
        let shutdown = self.shutdown.clone();
        let period = self.config.refresh_interval();

        let join = tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                let mut ticker = interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = ticker.tick() => {
                            log_debug!("Acquisition tick");
                            let attempt = Arc::clone(&handler);
                            tokio::spawn(async move {
                                attempt.acquire().await;
                            });
                        }
                    }
                }
            }
        });

        log_info!("Acquisition schedule started ({}ms)", period.as_millis());

        AcquisitionTask {
            shutdown,
            join: Some(join),
        }
    }

    /// Tears the handler down without a task guard
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
