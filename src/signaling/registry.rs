//! Session registry
//!
//! In-memory mapping from room to the participants currently in it. The
//! registry performs no cleanup on its own beyond removing a departing
//! participant; empty rooms are dropped as soon as they become empty.

use super::{ConnectionId, Participant, RoomId};
use std::collections::HashMap;

/// Storage seam for room membership.
///
/// The router only talks to rooms through this trait, so a shared store can
/// replace [`SessionRegistry`] for multi-instance deployments.
pub trait RoomStore: Send {
    /// Insert `conn` into `room` under `name`, creating the room if needed.
    /// Re-inserting overwrites the name.
    fn join(&mut self, room: &RoomId, conn: ConnectionId, name: &str);

    /// Remove `conn` from `room`. Returns false when there was nothing to remove.
    fn leave(&mut self, room: &RoomId, conn: ConnectionId) -> bool;

    /// All participants of `room` except `conn`
    fn list_others(&self, room: &RoomId, conn: ConnectionId) -> Vec<Participant>;

    /// Rooms in which `conn` has a participant entry
    fn rooms_containing(&self, conn: ConnectionId) -> Vec<RoomId>;

    /// Room recorded for `conn` at join time
    fn current_room(&self, conn: ConnectionId) -> Option<RoomId>;

    /// Number of non-empty rooms
    fn room_count(&self) -> usize;

    /// Number of participants across all rooms
    fn participant_count(&self) -> usize;
}

/// Default single-process room store
#[derive(Debug, Default, Clone)]
pub struct SessionRegistry {
    /// Map of room -> (connection -> display name)
    rooms: HashMap<RoomId, HashMap<ConnectionId, String>>,
    /// Map of connection -> the room it joined
    memberships: HashMap<ConnectionId, RoomId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn remove_entry(&mut self, room: &RoomId, conn: ConnectionId) -> bool {
        let Some(members) = self.rooms.get_mut(room) else {
            return false;
        };
        let removed = members.remove(&conn).is_some();
        if members.is_empty() {
            self.rooms.remove(room);
        }
        removed
    }
}

impl RoomStore for SessionRegistry {
    fn join(&mut self, room: &RoomId, conn: ConnectionId, name: &str) {
        // A connection lives in at most one room
        if let Some(previous) = self.memberships.insert(conn, room.clone()) {
            if previous != *room {
                self.remove_entry(&previous, conn);
            }
        }
        self.rooms
            .entry(room.clone())
            .or_default()
            .insert(conn, name.to_string());
    }

    fn leave(&mut self, room: &RoomId, conn: ConnectionId) -> bool {
        let removed = self.remove_entry(room, conn);
        if self.memberships.get(&conn) == Some(room) {
            self.memberships.remove(&conn);
        }
        removed
    }

    fn list_others(&self, room: &RoomId, conn: ConnectionId) -> Vec<Participant> {
        self.rooms
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .filter(|(id, _)| **id != conn)
                    .map(|(id, name)| Participant {
                        id: *id,
                        name: name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn rooms_containing(&self, conn: ConnectionId) -> Vec<RoomId> {
        self.rooms
            .iter()
            .filter(|(_, members)| members.contains_key(&conn))
            .map(|(room, _)| room.clone())
            .collect()
    }

    fn current_room(&self, conn: ConnectionId) -> Option<RoomId> {
        self.memberships.get(&conn).cloned()
    }

    fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn participant_count(&self) -> usize {
        self.rooms.values().map(HashMap::len).sum()
    }
}
