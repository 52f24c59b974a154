//! Prometheus metrics for the relay

use crate::error::RelayError;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Reason a message was not delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Relay target is not connected
    UnknownTarget,
    /// Sender has not joined a room
    NotJoined,
    /// Sender addressed a room it is not in
    WrongRoom,
    /// Frame could not be parsed
    Malformed,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::UnknownTarget => "unknown_target",
            DropReason::NotJoined => "not_joined",
            DropReason::WrongRoom => "wrong_room",
            DropReason::Malformed => "malformed",
        }
    }
}

/// Relay metrics, owned by a private Prometheus registry
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub connections: IntGauge,
    pub rooms: IntGauge,
    pub participants: IntGauge,
    pub messages: IntCounterVec,
    pub dropped: IntCounterVec,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("connections", &self.connections.get())
            .field("rooms", &self.rooms.get())
            .field("participants", &self.participants.get())
            .finish()
    }
}

impl Metrics {
    pub fn new() -> Result<Self, RelayError> {
        let registry = Registry::new();

        let connections = IntGauge::new("peer_relay_connections", "Current number of connections")?;
        let rooms = IntGauge::new("peer_relay_rooms", "Current number of non-empty rooms")?;
        let participants =
            IntGauge::new("peer_relay_participants", "Current number of joined participants")?;
        let messages = IntCounterVec::new(
            Opts::new("peer_relay_messages_total", "Inbound signaling messages by event"),
            &["event"],
        )?;
        let dropped = IntCounterVec::new(
            Opts::new("peer_relay_dropped_total", "Messages not delivered, by reason"),
            &["reason"],
        )?;

        registry.register(Box::new(connections.clone()))?;
        registry.register(Box::new(rooms.clone()))?;
        registry.register(Box::new(participants.clone()))?;
        registry.register(Box::new(messages.clone()))?;
        registry.register(Box::new(dropped.clone()))?;

        Ok(Self {
            registry,
            connections,
            rooms,
            participants,
            messages,
            dropped,
        })
    }

    pub fn record_message(&self, event: &str) {
        self.messages.with_label_values(&[event]).inc();
    }

    pub fn record_drop(&self, reason: DropReason) {
        self.dropped.with_label_values(&[reason.as_str()]).inc();
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> Result<String, RelayError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| RelayError::Metrics(e.to_string()))
    }
}
