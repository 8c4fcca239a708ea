use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "READALOUD_LOG";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Where log lines end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
    /// The terminal belongs to the UI.
    Discard,
}

pub fn log_target(settings: &LoggingSettings, headless: bool) -> LogTarget {
    match &settings.file {
        Some(path) => LogTarget::File(path.clone()),
        None if headless => LogTarget::Stderr,
        None => LogTarget::Discard,
    }
}

/// Filter from `READALOUD_LOG`, else `level`, else `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Install the global `tracing` subscriber.
pub fn init(settings: &LoggingSettings, headless: bool) -> Result<(), LoggingError> {
    let filter = env_filter(&settings.level);
    let installed = match log_target(settings, headless) {
        LogTarget::File(path) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(&path)?))
            .try_init(),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init(),
        LogTarget::Discard => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .try_init(),
    };
    installed.map_err(|err| LoggingError::Install(err.to_string()))
}
