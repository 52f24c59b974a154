//! Configuration management for peer-relay

use crate::error::RelayError;
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Signaling endpoint configuration
    #[serde(default)]
    pub signaling: SignalingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_origin: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Signaling WebSocket configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalingConfig {
    /// WebSocket endpoint path
    pub path: String,

    /// Ping interval in seconds
    pub ping_interval_secs: u64,

    /// Close a connection after this many seconds without inbound frames
    pub idle_timeout_secs: u64,

    /// Largest accepted frame in bytes
    pub max_message_bytes: usize,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            path: "/ws".to_string(),
            ping_interval_secs: 30,
            idle_timeout_secs: 60,
            max_message_bytes: 64 * 1024,
        }
    }
}

impl SignalingConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> Result<Self, RelayError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, RelayError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), RelayError> {
        let invalid = |msg: &str| Err(RelayError::InvalidConfig(msg.to_string()));

        if !self.signaling.path.starts_with('/') {
            return invalid("Signaling path must start with '/'");
        }

        if self.signaling.ping_interval_secs == 0 {
            return invalid("Signaling ping interval must be non-zero");
        }

        if self.signaling.idle_timeout_secs <= self.signaling.ping_interval_secs {
            return invalid("Signaling idle timeout must exceed the ping interval");
        }

        if self.signaling.max_message_bytes == 0 {
            return invalid("Signaling max message size must be non-zero");
        }

        if let Some(ref origin) = self.server.cors_origin {
            if HeaderValue::from_str(origin).is_err() {
                return invalid("Server cors_origin is not a valid header value");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use std::path::Path;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.server.port, 3001);
        assert_eq!(cfg.signaling.path, "/ws");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = Config::load(Path::new("/nonexistent/peer-relay.toml")).unwrap();
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg = Config::from_toml(
            r#"
            [server]
            port = 4000
            cors_origin = "http://localhost:3000"

            [signaling]
            path = "/signal"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.signaling.path, "/signal");
        assert_eq!(cfg.signaling.ping_interval_secs, 30);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::from_toml("[server\nport = 1").is_err());
        assert!(Config::from_toml("[server]\nport = \"high\"").is_err());
    }

    #[test]
    fn validate_rejects_relative_path() {
        let mut cfg = Config::default();
        cfg.signaling.path = "ws".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_idle_timeout_below_ping() {
        let mut cfg = Config::default();
        cfg.signaling.idle_timeout_secs = cfg.signaling.ping_interval_secs;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_origin() {
        let mut cfg = Config::default();
        cfg.server.cors_origin = Some("http://bad\norigin".to_string());
        assert!(cfg.validate().is_err());
    }
}
