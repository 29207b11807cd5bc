//! Error types for settings loading and logger construction

use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration errors. All of these are fatal.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("invalid LOGGING_LEVEL: {0}")]
    InvalidLevel(String),
    #[error("invalid SERVER_PORT: {0}")]
    InvalidPort(String),
    #[error("failed to create directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to resolve project root: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Errors raised while attaching sinks to a logger
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("failed to open log file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
