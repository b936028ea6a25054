use std::sync::{atomic::Ordering, Arc};

use chrono::Local;
use tokio::time::Instant;

use crate::{
    config::AcquisitionMode,
    error::Result,
    log_debug, log_info, log_warn,
    transport::DeviceTransport,
    types::{Reading, RollingHistory, TelemetrySnapshot},
};

use super::TelemetryHandler;

/// Consecutive discarded responses after which the snapshot reports the device as too slow
pub const STALE_STREAK_LIMIT: u32 = 3;

impl TelemetryHandler {
    /// One acquisition attempt. Never fails: problems land in the snapshot.
    pub async fn acquire(&self) -> Arc<TelemetrySnapshot> {
        if self.shutdown.is_cancelled() {
            return self.snapshot();
        }

        let seq = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;

        match self.live_transport() {
            Some(transport) => {
                let outcome = tokio::select! {
                    _ = self.shutdown.cancelled() => return self.snapshot(),
                    outcome = fetch_live(&*transport) => outcome,
                };
                self.apply_live(seq, outcome);
            }
            None => self.apply_simulated(),
        }

        self.snapshot()
    }

    /// Manual re-acquire, same as a scheduled tick
    pub async fn refetch(&self) -> Arc<TelemetrySnapshot> {
        self.acquire().await
    }

    pub(super) fn live_transport(&self) -> Option<Arc<dyn DeviceTransport>> {
        match self.mode {
            AcquisitionMode::Live { .. } => self.transport.clone(),
            AcquisitionMode::Simulation => None,
        }
    }

    fn apply_simulated(&self) {
        let now = Instant::now();

        self.snapshot_tx.send_if_modified(|current| {
            if self.shutdown.is_cancelled() {
                return false;
            }

            let mut simulator = self.simulator.lock().unwrap_or_else(|e| e.into_inner());
            let reading = simulator.sample(current.data.as_ref(), now);

            let mut history = match &current.history {
                Some(history) => history.clone(),
                None => simulator.seed_history(),
            };
            history.push(reading.temperature, reading.pressure, reading.battery);

            log_debug!(
                "Simulated reading: temp={:.2} hum={:.1} pressure={:.2} battery={:.3} health={}",
                reading.temperature, reading.humidity, reading.pressure, reading.battery, reading.health_text
            );

            *current = Arc::new(TelemetrySnapshot {
                data: Some(reading),
                history: Some(history),
                is_connected: true,
                is_loading: false,
                error: None,
                last_update: Some(Local::now()),
            });
            true
        });
    }

    fn apply_live(&self, seq: u64, outcome: Result<(Reading, RollingHistory)>) {
        self.snapshot_tx.send_if_modified(|current| {
            if self.shutdown.is_cancelled() {
                return false;
            }

            let latest = self.dispatched.load(Ordering::SeqCst);
            if seq != latest {
                let streak = self.stale_streak.fetch_add(1, Ordering::SeqCst) + 1;
                log_debug!("Discarding response of attempt #{} (latest is #{})", seq, latest);

                let too_slow = streak == STALE_STREAK_LIMIT;
                if !current.is_loading && !too_slow {
                    return false;
                }

                let mut next = TelemetrySnapshot::clone(&**current);
                next.is_loading = false;
                if too_slow {
                    log_warn!(
                        "{} responses in a row arrived after a newer attempt; device is slower than the {}ms refresh interval",
                        streak, self.config.refresh_interval_ms
                    );
                    next.error = Some(format!(
                        "Device responses are slower than the {}ms refresh interval",
                        self.config.refresh_interval_ms
                    ));
                }
                *current = Arc::new(next);
                return true;
            }
            self.stale_streak.store(0, Ordering::SeqCst);

            let was_connected = current.is_connected;

            let next = match outcome {
                Ok((reading, history)) => {
                    if !was_connected {
                        log_info!("Device connected ({} history samples)", history.len());
                    }
                    TelemetrySnapshot {
                        data: Some(reading),
                        history: Some(history),
                        is_connected: true,
                        is_loading: false,
                        error: None,
                        last_update: Some(Local::now()),
                    }
                }
                Err(e) => {
                    if was_connected || current.is_loading {
                        log_warn!("Device unreachable: {}", e);
                    } else {
                        log_debug!("Device still unreachable: {}", e);
                    }
                    TelemetrySnapshot {
                        is_connected: false,
                        is_loading: false,
                        error: Some(e.to_string()),
                        ..TelemetrySnapshot::clone(&**current)
                    }
                }
            };

            *current = Arc::new(next);
            true
        });
    }
}

async fn fetch_live(transport: &dyn DeviceTransport) -> Result<(Reading, RollingHistory)> {
    let (reading, history) = tokio::join!(transport.fetch_reading(), transport.fetch_history());
    Ok((reading?, history?))
}
