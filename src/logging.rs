use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::utils;

pub const LOG_FILE_NAME: &str = "rtrack.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Could not determine data directory for the log file")]
    NoDataDir,
    #[error("Failed to open log file: {0}")]
    OpenError(#[from] std::io::Error),
    #[error("Failed to install log subscriber: {0}")]
    InitError(String),
}

/// Log file location for the profile
pub fn log_path(profile: utils::Profile) -> Result<PathBuf, LoggingError> {
    utils::get_data_dir(profile)
        .map(|dir| dir.join(LOG_FILE_NAME))
        .ok_or(LoggingError::NoDataDir)
}

/// Send `tracing` output to `path` as plain text. The terminal belongs to the
/// TUI, so nothing is written to stdout or stderr.
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init(path: &Path, default_level: &str) -> Result<(), LoggingError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| LoggingError::InitError(e.to_string()))
}
