// src/util/log.rs

//! Logger Utility - file-based logging split by severity, mirrored to `tracing`
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::OnceLock;
use chrono::Local;

pub use tracing;

pub static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Global file logger, present only after [`init`] succeeded.
/// Until then the macros only emit `tracing` events.
pub static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Log severity levels
#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn as_str(&self) -> &str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn filename(&self) -> &str {
        match self {
            LogLevel::Error => "error.log",
            LogLevel::Warn => "warn.log",
            LogLevel::Info => "info.log",
            LogLevel::Debug => "debug.log",
        }
    }
}

/// Logger that writes to separate files by severity
pub struct Logger {
    log_dir: PathBuf,
    error_file: Mutex<File>,
    warn_file: Mutex<File>,
    info_file: Mutex<File>,
    debug_file: Mutex<File>,
}

impl Logger {
    /// Create a new logger with the specified directory
    pub fn new<P: AsRef<Path>>(log_dir: P) -> std::io::Result<Self> {
        let log_dir = log_dir.as_ref().to_path_buf();

        create_dir_all(&log_dir)?;

        // Start fresh on every run
        let open = |level: LogLevel| File::create(log_dir.join(level.filename()));

        Ok(Self {
            error_file: Mutex::new(open(LogLevel::Error)?),
            warn_file: Mutex::new(open(LogLevel::Warn)?),
            info_file: Mutex::new(open(LogLevel::Info)?),
            debug_file: Mutex::new(open(LogLevel::Debug)?),
            log_dir,
        })
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Write a log entry to the appropriate file
    fn write_log(&self, level: LogLevel, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let formatted = format!("[{}] [{}] {}\n", timestamp, level.as_str(), message);

        let file = match level {
            LogLevel::Error => &self.error_file,
            LogLevel::Warn => &self.warn_file,
            LogLevel::Info => &self.info_file,
            LogLevel::Debug => &self.debug_file,
        };

        if let Ok(mut file) = file.lock() {
            let _ = file.write_all(formatted.as_bytes());
            let _ = file.flush();
        }
    }

    pub fn error(&self, message: &str) {
        self.write_log(LogLevel::Error, message);
    }

    pub fn warn(&self, message: &str) {
        self.write_log(LogLevel::Warn, message);
    }

    pub fn info(&self, message: &str) {
        self.write_log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.write_log(LogLevel::Debug, message);
    }
}

/// Install the global file logger. A second call keeps the first logger.
pub fn init<P: AsRef<Path>>(log_dir: P) -> std::io::Result<()> {
    DEBUG_ENABLED.get_or_init(|| {
        std::env::var("DEBUG").unwrap_or_default() == "true"
    });

    if LOGGER.get().is_some() {
        return Ok(());
    }

    let logger = Logger::new(log_dir)?;
    let _ = LOGGER.set(logger);
    Ok(())
}

pub fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get().unwrap_or(&false)
}

/// Convenience macro for error logging with formatting
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::util::log::tracing::error!("{}", message);
        if let Some(logger) = $crate::util::log::LOGGER.get() {
            logger.error(&message);
        }
    }};
}

/// Convenience macro for warning logging with formatting
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::util::log::tracing::warn!("{}", message);
        if let Some(logger) = $crate::util::log::LOGGER.get() {
            logger.warn(&message);
        }
    }};
}

/// Convenience macro for info logging with formatting
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::util::log::tracing::info!("{}", message);
        if let Some(logger) = $crate::util::log::LOGGER.get() {
            logger.info(&message);
        }
    }};
}

/// Convenience macro for debug logging with formatting
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::util::log::tracing::debug!("{}", message);
        if $crate::util::log::debug_enabled() {
            if let Some(logger) = $crate::util::log::LOGGER.get() {
                logger.debug(&message);
            }
        }
    }};
}
