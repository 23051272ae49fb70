//! Error types for the monitor crate

use thiserror::Error;

/// Result type alias for the monitor crate
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors that can occur at the monitor's ingestion and configuration
/// boundaries. Tracking itself is infallible; fallibility stops here.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid detection: {0}")]
    InvalidDetection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MonitorError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_detection<S: Into<String>>(msg: S) -> Self {
        Self::InvalidDetection(msg.into())
    }
}
