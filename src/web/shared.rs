//! Shared state for peer-relay
//!
//! Handed to every HTTP handler and signaling connection.

use crate::config::Config;
use crate::metrics::Metrics;
use crate::signaling::RouterHandle;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared state for the application
#[derive(Clone)]
pub struct SharedState {
    /// Configuration
    pub config: Arc<Config>,

    /// Handle feeding the signaling router task
    pub router: RouterHandle,

    /// Relay metrics
    pub metrics: Arc<Metrics>,

    /// Server start time
    pub start_time: Instant,
}

impl std::fmt::Debug for SharedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedState")
            .field("config", &self.config)
            .field("connections", &self.connection_count())
            .field("rooms", &self.room_count())
            .finish()
    }
}

impl SharedState {
    pub fn new(config: Config, router: RouterHandle, metrics: Arc<Metrics>) -> Self {
        Self {
            config: Arc::new(config),
            router,
            metrics,
            start_time: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn connection_count(&self) -> u64 {
        self.metrics.connections.get().max(0) as u64
    }

    pub fn room_count(&self) -> u64 {
        self.metrics.rooms.get().max(0) as u64
    }
}
