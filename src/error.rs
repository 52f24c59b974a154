//! Error types for the relay

use thiserror::Error;

/// Errors raised outside the fire-and-forget signaling path
#[derive(Error, Debug)]
pub enum RelayError {
    /// Socket or file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration parsed but is not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// The router task is no longer running
    #[error("Signaling router closed")]
    RouterClosed,
}

impl From<prometheus::Error> for RelayError {
    fn from(err: prometheus::Error) -> Self {
        RelayError::Metrics(err.to_string())
    }
}
