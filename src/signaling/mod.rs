//! Room signaling core
//!
//! This module provides the room/session state and the message routing
//! protocol that lets peers find each other and exchange negotiation data:
//! - Session registry (who is in which room)
//! - Wire protocol (named JSON events)
//! - Signaling router (join/relay/leave state machine)

pub mod protocol;
pub mod registry;
pub mod router;

pub use protocol::{ClientMessage, PeerInfo, ServerMessage, Signal};
pub use registry::{RoomStore, SessionRegistry};
pub use router::{RouterCommand, RouterHandle, SignalingRouter};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier assigned to a client connection for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Generate a fresh, unguessable connection identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier, an opaque case-sensitive token chosen by clients
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl From<&str> for RoomId {
    fn from(room: &str) -> Self {
        Self(room.to_string())
    }
}

impl From<String> for RoomId {
    fn from(room: String) -> Self {
        Self(room)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A connected client inside a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ConnectionId,
    pub name: String,
}
