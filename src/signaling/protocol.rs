//! Signaling wire protocol
//!
//! Every frame is a JSON object carrying an event name and its payload:
//! `{"event": "relay-offer", "data": {"targetId": "...", "signal": ...}}`.
//! Negotiation payloads are opaque and relayed verbatim.

use super::{ConnectionId, Participant, RoomId};
use crate::error::RelayError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque negotiation payload (offer, answer or candidate)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(pub Value);

impl From<Value> for Signal {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Signal {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

/// Peer entry of a `peers-list` message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    pub id: ConnectionId,
    pub name: String,
}

impl From<Participant> for PeerInfo {
    fn from(participant: Participant) -> Self {
        Self {
            id: participant.id,
            name: participant.name,
        }
    }
}

/// Messages sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    /// Join a room under a display name
    Join { room: RoomId, name: String },

    /// Deliver a negotiation payload to another connection
    RelayOffer { target_id: ConnectionId, signal: Signal },

    /// Return an answer payload to the connection that signaled us
    RelayAnswer { target_id: ConnectionId, signal: Signal },

    /// Chat text for everyone else in the room
    ChatRelay {
        room: RoomId,
        text: String,
        name: String,
    },

    /// Announce a screen share to the room
    ScreenShare { room: RoomId, stream: Signal },

    /// Announce the end of a screen share
    ScreenShareEnded { room: RoomId },

    /// Leave the current room but keep the connection open
    Leave,
}

impl ClientMessage {
    /// Parse a client frame
    pub fn from_json(json: &str) -> Result<Self, RelayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Event name, used for logs and metrics labels
    pub fn event(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => "join",
            ClientMessage::RelayOffer { .. } => "relay-offer",
            ClientMessage::RelayAnswer { .. } => "relay-answer",
            ClientMessage::ChatRelay { .. } => "chat-relay",
            ClientMessage::ScreenShare { .. } => "screen-share",
            ClientMessage::ScreenShareEnded { .. } => "screen-share-ended",
            ClientMessage::Leave => "leave",
        }
    }
}

/// Messages emitted by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// Identifier assigned to this connection, sent once on connect
    Connected { id: ConnectionId },

    /// Existing room members, sent only to the joiner
    PeersList { peers: Vec<PeerInfo> },

    /// Presence announcement of a newcomer; `signal` is always null
    PeerJoined {
        caller_id: ConnectionId,
        name: String,
        signal: Option<Signal>,
    },

    /// Negotiation payload relayed from `caller_id`
    PeerSignal {
        signal: Signal,
        caller_id: ConnectionId,
    },

    /// Answer payload relayed from `id`
    SignalReturned { id: ConnectionId, signal: Signal },

    /// Chat text from another room member
    MessageReceived { user: String, text: String },

    /// A room member went away
    PeerLeft { conn_id: ConnectionId },

    /// A room member started sharing its screen
    PeerScreenShare { peer_id: ConnectionId, stream: Signal },

    /// A room member stopped sharing its screen
    PeerScreenShareEnded { peer_id: ConnectionId },
}

impl ServerMessage {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, RelayError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Create a presence announcement for a newly joined connection
    pub fn peer_joined(caller_id: ConnectionId, name: &str) -> Self {
        ServerMessage::PeerJoined {
            caller_id,
            name: name.to_string(),
            signal: None,
        }
    }

    /// Event name, used for logs and metrics labels
    pub fn event(&self) -> &'static str {
        match self {
            ServerMessage::Connected { .. } => "connected",
            ServerMessage::PeersList { .. } => "peers-list",
            ServerMessage::PeerJoined { .. } => "peer-joined",
            ServerMessage::PeerSignal { .. } => "peer-signal",
            ServerMessage::SignalReturned { .. } => "signal-returned",
            ServerMessage::MessageReceived { .. } => "message-received",
            ServerMessage::PeerLeft { .. } => "peer-left",
            ServerMessage::PeerScreenShare { .. } => "peer-screen-share",
            ServerMessage::PeerScreenShareEnded { .. } => "peer-screen-share-ended",
        }
    }
}
