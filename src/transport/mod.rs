//! Transport layer for peer-relay
//!
//! Carries signaling messages over WebSocket connections.

pub mod signaling_server;

pub use signaling_server::handle_signaling_connection;
