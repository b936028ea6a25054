use std::sync::{
    atomic::{AtomicU32, AtomicU64},
    Arc, Mutex,
};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    config::{AcquisitionMode, TelemetryConfig},
    error::{Result, TelemetryError},
    log_info,
    simulation::Simulator,
    transport::{DeviceTransport, HttpTransport},
    types::TelemetrySnapshot,
};

use super::TelemetryHandler;

impl TelemetryHandler {
    /// Builds the handler described by `config`, with an HTTP transport in live mode.
    pub fn from_config(config: TelemetryConfig) -> Result<Self> {
        config.validate()?;

        let transport: Option<Arc<dyn DeviceTransport>> = match config.mode() {
            AcquisitionMode::Live { base_url } => Some(Arc::new(HttpTransport::new(
                &base_url,
                config.request_timeout(),
            )?)),
            AcquisitionMode::Simulation => None,
        };

        Self::new(config, transport, Simulator::new())
    }

    pub fn with_transport(config: TelemetryConfig, transport: Arc<dyn DeviceTransport>) -> Result<Self> {
        Self::new(config, Some(transport), Simulator::new())
    }

    /// Rejects an invalid config. Live mode requires a transport; in simulation
    /// mode it is never called.
    pub fn new(
        config: TelemetryConfig,
        transport: Option<Arc<dyn DeviceTransport>>,
        simulator: Simulator,
    ) -> Result<Self> {
        config.validate()?;

        let mode = config.mode();

        if matches!(mode, AcquisitionMode::Live { .. }) && transport.is_none() {
            return Err(TelemetryError::Config("live mode requires a device transport".into()));
        }

        match &mode {
            AcquisitionMode::Live { base_url } => log_info!(
                "Telemetry handler polling {} every {}ms", base_url, config.refresh_interval_ms
            ),
            AcquisitionMode::Simulation => log_info!(
                "Telemetry handler simulating readings every {}ms", config.refresh_interval_ms
            ),
        }

        let (snapshot_tx, _) = watch::channel(Arc::new(TelemetrySnapshot::default()));

        Ok(Self {
            config,
            mode,
            transport,
            simulator: Mutex::new(simulator),
            snapshot_tx,
            dispatched: AtomicU64::new(0),
            stale_streak: AtomicU32::new(0),
            shutdown: CancellationToken::new(),
        })
    }
}
