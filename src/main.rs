use std::path::PathBuf;
use std::sync::Arc;

use envmon_runtime_rust::{
    log_error, log_info,
    types::TelemetrySnapshot,
    util::{log, string::StringUtils},
    TelemetryConfig, TelemetryHandler,
};

struct Args {
    config_path: Option<PathBuf>,
    export_csv: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args { config_path: None, export_csv: None };
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--export-csv" => args.export_csv = iter.next().map(PathBuf::from),
            _ => args.config_path = Some(PathBuf::from(arg)),
        }
    }

    args
}

fn status_line(snapshot: &TelemetrySnapshot) -> String {
    if snapshot.is_loading {
        return "Connecting to device...".to_string();
    }

    let link = if snapshot.is_connected { "ONLINE " } else { "OFFLINE" };

    let Some(data) = &snapshot.data else {
        return format!(
            "[{}] no data yet: {}",
            link,
            snapshot.error.as_deref().unwrap_or("waiting")
        );
    };

    let mut line = format!(
        "[{}] {:.1}°C {:.0}% {:.1} hPa | battery {:.2} V ({}%) | {} | {} | up {}",
        link,
        data.temperature,
        data.humidity,
        data.pressure,
        data.battery,
        data.battery_percent,
        data.health_text,
        data.trend_text,
        StringUtils::format_uptime(data.uptime),
    );

    if let Some(error) = &snapshot.error {
        line.push_str(&format!(" | last known, error: {}", error));
    }
    if let Some(at) = snapshot.last_update {
        line.push_str(&format!(" @ {}", at.format("%H:%M:%S")));
    }

    line
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    tracing_subscriber::fmt::init();
    color_eyre::install()?;

    let args = parse_args();

    let config = match &args.config_path {
        Some(path) => TelemetryConfig::load(path)?,
        None => TelemetryConfig::load_or_default(&[
            PathBuf::from("config").join("telemetry.yaml"),
            PathBuf::from("..").join("config").join("telemetry.yaml"),
        ]),
    };

    if let Err(e) = log::init(&config.log_dir) {
        tracing::warn!("File logging disabled ({}): {}", config.log_dir, e);
    }

    let handler = Arc::new(TelemetryHandler::from_config(config)?);
    let mut updates = handler.subscribe();
    let task = handler.start();

    log_info!("Telemetry runtime started in {:?} mode", handler.mode());

    let mut export_csv = args.export_csv;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                println!("{}", status_line(&snapshot));

                if let Some(history) = &snapshot.history {
                    if let Some(path) = export_csv.take() {
                        match std::fs::write(&path, history.to_csv()) {
                            Ok(()) => log_info!("History exported to {}", path.display()),
                            Err(e) => log_error!("History export to {} failed: {}", path.display(), e),
                        }
                    }
                }
            }
        }
    }

    task.stop().await;
    Ok(())
}
