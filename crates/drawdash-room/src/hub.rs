//! Broadcast hub: a room's live connections and event fan-out.

use std::collections::HashMap;

use drawdash_protocol::{ConnectionId, PlayerId, ServerEvent};
use tokio::sync::mpsc;

/// Channel sender delivering outbound events to one connection.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

struct Connection {
    sender: EventSender,
    /// The player this connection belongs to, once they have joined.
    /// Unbound connections (e.g. a lobby view) still receive broadcasts.
    player: Option<PlayerId>,
}

/// Tracks a room's live connections and fans events out to them.
///
/// The hub is owned by the room actor, so adds and removes are serialized
/// with the state changes that trigger broadcasts. Fan-out is best-effort:
/// a send failing (receiver dropped) removes that connection and never
/// fails the operation that broadcast.
#[derive(Default)]
pub struct BroadcastHub {
    connections: HashMap<ConnectionId, Connection>,
    next_id: u64,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and returns its id.
    pub fn add(&mut self, sender: EventSender) -> ConnectionId {
        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        self.connections.insert(id, Connection { sender, player: None });
        id
    }

    /// Removes a connection. Returns `false` if it was already gone.
    pub fn remove(&mut self, conn: ConnectionId) -> bool {
        self.connections.remove(&conn).is_some()
    }

    /// Associates a connection with a player.
    pub fn bind(&mut self, conn: ConnectionId, player: PlayerId) {
        if let Some(entry) = self.connections.get_mut(&conn) {
            entry.player = Some(player);
        }
    }

    /// Clears a player's binding, keeping their connection subscribed.
    pub fn unbind(&mut self, player: &PlayerId) {
        for entry in self.connections.values_mut() {
            if entry.player.as_ref() == Some(player) {
                entry.player = None;
            }
        }
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Sends `event` to every connection.
    pub fn broadcast(&mut self, event: &ServerEvent) {
        self.fan_out(|_, _| Some(event.clone()));
    }

    /// Sends `event` to every connection except `skip`.
    pub fn broadcast_except(&mut self, skip: ConnectionId, event: &ServerEvent) {
        self.fan_out(|id, _| (id != skip).then(|| event.clone()));
    }

    /// Builds a per-recipient event from the connection's bound player.
    ///
    /// This is the word-redaction path: round announcements give the drawer
    /// a different payload than everyone else.
    pub fn broadcast_with<F>(&mut self, mut make: F)
    where
        F: FnMut(Option<&PlayerId>) -> ServerEvent,
    {
        self.fan_out(|_, player| Some(make(player)));
    }

    fn fan_out<F>(&mut self, mut make: F)
    where
        F: FnMut(ConnectionId, Option<&PlayerId>) -> Option<ServerEvent>,
    {
        let mut dead = Vec::new();
        for (id, entry) in &self.connections {
            let Some(event) = make(*id, entry.player.as_ref()) else {
                continue;
            };
            if entry.sender.send(event).is_err() {
                dead.push(*id);
            }
        }
        for id in dead {
            self.connections.remove(&id);
            tracing::debug!(conn = %id, "dropped dead connection");
        }
    }
}
