//! peer-relay - room-based WebRTC signaling relay
//!
//! Clients join a room over WebSocket, learn who else is there, and relay
//! opaque offer/answer payloads to each other until their peer-to-peer
//! connection is up. The relay keeps no state beyond current room membership.

pub mod args;
pub mod config;
pub mod error;
pub mod metrics;
pub mod signaling;
pub mod transport;
pub mod web;

// Re-exports
pub use config::Config;
pub use error::RelayError;
pub use metrics::Metrics;
pub use signaling::{ClientMessage, ConnectionId, RoomId, ServerMessage, SignalingRouter};
pub use web::{run_http_server, SharedState};
