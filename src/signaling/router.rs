//! Signaling router
//!
//! Owns the room store and the outbound channel of every live connection.
//! A single task drains [`RouterCommand`]s one at a time, so each join,
//! relay or leave runs to completion against the store without locking.
//! Every send is fire-and-forget: a message addressed to a connection that
//! is gone is dropped and the sender is never told.

use super::protocol::{ClientMessage, PeerInfo, ServerMessage, Signal};
use super::registry::{RoomStore, SessionRegistry};
use super::{ConnectionId, RoomId};
use crate::error::RelayError;
use crate::metrics::{DropReason, Metrics};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Work item for the router task
#[derive(Debug)]
pub enum RouterCommand {
    /// A transport connection was established
    Connect {
        id: ConnectionId,
        outbound: mpsc::UnboundedSender<ServerMessage>,
    },
    /// A parsed frame arrived on a connection
    Message {
        id: ConnectionId,
        message: ClientMessage,
    },
    /// The transport reported the connection closed
    Disconnect { id: ConnectionId },
}

/// Cloneable handle used by transport tasks to feed the router
#[derive(Debug, Clone)]
pub struct RouterHandle {
    tx: mpsc::UnboundedSender<RouterCommand>,
}

impl RouterHandle {
    /// Register a connection and return the receiver for its outbound messages
    pub fn connect(&self, id: ConnectionId) -> Result<mpsc::UnboundedReceiver<ServerMessage>, RelayError> {
        let (outbound, rx) = mpsc::unbounded_channel();
        self.send(RouterCommand::Connect { id, outbound })?;
        Ok(rx)
    }

    pub fn message(&self, id: ConnectionId, message: ClientMessage) -> Result<(), RelayError> {
        self.send(RouterCommand::Message { id, message })
    }

    pub fn disconnect(&self, id: ConnectionId) -> Result<(), RelayError> {
        self.send(RouterCommand::Disconnect { id })
    }

    fn send(&self, command: RouterCommand) -> Result<(), RelayError> {
        self.tx.send(command).map_err(|_| RelayError::RouterClosed)
    }
}

/// Join/relay/leave state machine over a [`RoomStore`]
pub struct SignalingRouter<S: RoomStore = SessionRegistry> {
    store: S,
    connections: HashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>,
    metrics: Arc<Metrics>,
}

impl SignalingRouter<SessionRegistry> {
    /// Create a router backed by the in-memory registry
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self::with_store(SessionRegistry::new(), metrics)
    }
}

impl<S: RoomStore + 'static> SignalingRouter<S> {
    /// Create a router over a custom room store
    pub fn with_store(store: S, metrics: Arc<Metrics>) -> Self {
        Self {
            store,
            connections: HashMap::new(),
            metrics,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Move the router onto its own task and return the handle feeding it.
    ///
    /// The task ends once every [`RouterHandle`] has been dropped.
    pub fn spawn(self) -> (RouterHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (RouterHandle { tx }, task)
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<RouterCommand>) {
        while let Some(command) = rx.recv().await {
            self.dispatch(command);
        }
        debug!("Signaling router stopped");
    }

    pub fn dispatch(&mut self, command: RouterCommand) {
        match command {
            RouterCommand::Connect { id, outbound } => self.connect(id, outbound),
            RouterCommand::Message { id, message } => self.handle(id, message),
            RouterCommand::Disconnect { id } => self.disconnect(id),
        }
    }

    pub fn connect(&mut self, id: ConnectionId, outbound: mpsc::UnboundedSender<ServerMessage>) {
        let _ = outbound.send(ServerMessage::Connected { id });
        self.connections.insert(id, outbound);
        debug!("Connection {} registered", id);
        self.update_gauges();
    }

    /// Apply one client message
    pub fn handle(&mut self, id: ConnectionId, message: ClientMessage) {
        if !self.connections.contains_key(&id) {
            debug!("Ignoring {} from closed connection {}", message.event(), id);
            return;
        }
        self.metrics.record_message(message.event());

        match message {
            ClientMessage::Join { room, name } => self.join(id, room, name),

            ClientMessage::RelayOffer { target_id, signal } => {
                if self.require_joined(id).is_some() {
                    let relayed = ServerMessage::PeerSignal {
                        signal,
                        caller_id: id,
                    };
                    self.relay(id, target_id, relayed);
                }
            }

            ClientMessage::RelayAnswer { target_id, signal } => {
                if self.require_joined(id).is_some() {
                    let relayed = ServerMessage::SignalReturned { id, signal };
                    self.relay(id, target_id, relayed);
                }
            }

            ClientMessage::ChatRelay { room, text, name } => {
                if self.require_room(id, &room) {
                    self.broadcast(&room, id, ServerMessage::MessageReceived { user: name, text });
                }
            }

            ClientMessage::ScreenShare { room, stream } => {
                if self.require_room(id, &room) {
                    self.announce_screen_share(&room, id, stream);
                }
            }

            ClientMessage::ScreenShareEnded { room } => {
                if self.require_room(id, &room) {
                    self.broadcast(&room, id, ServerMessage::PeerScreenShareEnded { peer_id: id });
                }
            }

            ClientMessage::Leave => {
                if self.require_joined(id).is_some() {
                    self.leave_rooms(id);
                    self.update_gauges();
                }
            }
        }
    }

    /// Forget a connection and notify the rooms it was in
    pub fn disconnect(&mut self, id: ConnectionId) {
        if self.connections.remove(&id).is_none() {
            return;
        }
        self.leave_rooms(id);
        info!("Connection {} closed", id);
        self.update_gauges();
    }

    fn join(&mut self, id: ConnectionId, room: RoomId, name: String) {
        if let Some(previous) = self.store.current_room(id) {
            debug!("Connection {} re-joining, leaving room {} first", id, previous);
            self.leave_rooms(id);
        }

        self.store.join(&room, id, &name);
        let peers = self.store.list_others(&room, id);
        info!("Connection {} joined room {} as {:?} ({} peers)", id, room, name, peers.len());

        let peers: Vec<PeerInfo> = peers.into_iter().map(PeerInfo::from).collect();
        let recipients: Vec<ConnectionId> = peers.iter().map(|peer| peer.id).collect();
        self.deliver(id, ServerMessage::PeersList { peers });

        let announcement = ServerMessage::peer_joined(id, &name);
        for peer in recipients {
            self.deliver(peer, announcement.clone());
        }
        self.update_gauges();
    }

    fn leave_rooms(&mut self, id: ConnectionId) {
        for room in self.store.rooms_containing(id) {
            if self.store.leave(&room, id) {
                info!("Connection {} left room {}", id, room);
                self.broadcast(&room, id, ServerMessage::PeerLeft { conn_id: id });
            }
        }
    }

    fn announce_screen_share(&self, room: &RoomId, id: ConnectionId, stream: Signal) {
        self.broadcast(room, id, ServerMessage::PeerScreenShare { peer_id: id, stream });
    }

    fn relay(&self, sender: ConnectionId, target: ConnectionId, message: ServerMessage) {
        let event = message.event();
        if self.deliver(target, message) {
            debug!("Relayed {} from {} to {}", event, sender, target);
        } else {
            debug!("Dropped {} from {}: target {} not connected", event, sender, target);
            self.metrics.record_drop(DropReason::UnknownTarget);
        }
    }

    /// Send to every participant of `room` except `except`
    fn broadcast(&self, room: &RoomId, except: ConnectionId, message: ServerMessage) {
        for peer in self.store.list_others(room, except) {
            self.deliver(peer.id, message.clone());
        }
    }

    fn deliver(&self, target: ConnectionId, message: ServerMessage) -> bool {
        match self.connections.get(&target) {
            Some(outbound) => outbound.send(message).is_ok(),
            None => false,
        }
    }

    fn require_joined(&self, id: ConnectionId) -> Option<RoomId> {
        let room = self.store.current_room(id);
        if room.is_none() {
            debug!("Dropped message from {}: not in a room", id);
            self.metrics.record_drop(DropReason::NotJoined);
        }
        room
    }

    fn require_room(&self, id: ConnectionId, room: &RoomId) -> bool {
        match self.require_joined(id) {
            Some(current) if current == *room => true,
            Some(current) => {
                debug!("Dropped message from {}: addressed room {} but joined {}", id, room, current);
                self.metrics.record_drop(DropReason::WrongRoom);
                false
            }
            None => false,
        }
    }

    fn update_gauges(&self) {
        self.metrics.connections.set(self.connections.len() as i64);
        self.metrics.rooms.set(self.store.room_count() as i64);
        self.metrics.participants.set(self.store.participant_count() as i64);
    }
}
