//! Tracing setup: stdout plus a rolling log file.

mod init;

pub use init::{init_logging, parse_rotation};

use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::Level;
use tracing_appender::rolling::Rotation;

/// Log filename inside the log directory.
pub const LOG_FILENAME: &str = "streams-server.log";

/// Log file path, recorded once at startup and echoed in error bodies.
static LOG_FILE_PATH: OnceLock<String> = OnceLock::new();

pub fn set_log_file_path(path: String) {
    // First caller wins; later calls keep the original path.
    if LOG_FILE_PATH.set(path).is_err() {
        tracing::debug!("Log file path already set");
    }
}

/// Log file path, or an empty string before logging is initialized.
pub fn get_log_file_path() -> &'static str {
    LOG_FILE_PATH.get().map_or("", String::as_str)
}

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    /// Default level when `RUST_LOG` is unset
    pub log_level: Level,
    pub json_format: bool,
    pub rotation: Rotation,
}

/// `~/.streams/logs`, or `./.streams/logs` without a home directory.
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".streams")
        .join("logs")
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_level: Level::INFO,
            json_format: false,
            rotation: Rotation::DAILY,
        }
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod logging_tests;
