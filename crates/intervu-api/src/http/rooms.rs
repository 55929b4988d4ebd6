//! Per-session broadcast rooms for realtime connections.
//!
//! Every socket attached to a session subscribes to that session's
//! broadcast channel; frames that concern the whole session (the
//! time-running-out question) are published here instead of being written
//! to a single socket.

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::frames::ServerFrame;

const ROOM_CAPACITY: usize = 64;

#[derive(Default)]
pub struct SessionRooms {
    rooms: DashMap<Uuid, broadcast::Sender<ServerFrame>>,
}

impl SessionRooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a session's room, creating it on first join.
    pub fn join(&self, session_id: Uuid) -> broadcast::Receiver<ServerFrame> {
        self.rooms
            .entry(session_id)
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    /// Publish to every member; returns how many received it.
    pub fn broadcast(&self, session_id: &Uuid, frame: ServerFrame) -> usize {
        match self.rooms.get(session_id) {
            Some(tx) => tx.send(frame).unwrap_or(0),
            None => 0,
        }
    }

    /// Drop the room once its last receiver is gone.
    pub fn leave(&self, session_id: &Uuid) {
        self.rooms
            .remove_if(session_id, |_, tx| tx.receiver_count() == 0);
    }

    pub fn member_count(&self, session_id: &Uuid) -> usize {
        self.rooms
            .get(session_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}
