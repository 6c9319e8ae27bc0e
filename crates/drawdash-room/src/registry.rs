//! Room registry: the process-wide table of active rooms and the inbound
//! command surface the transport layer calls.
//!
//! The registry only needs concurrency-safety for insert/remove/lookup;
//! in-room mutation is the room actor's job. The table lock is never held
//! across an await into a room, so rooms never serialize against each
//! other.

use std::collections::HashMap;
use std::sync::Arc;

use drawdash_protocol::{ConnectionId, PlayerId, RoomCode, RoomSnapshot};
use rand::Rng;
use tokio::sync::Mutex;

use crate::hub::EventSender;
use crate::session::{RoomHandle, spawn_room};
use crate::{RoomConfig, RoomError};

/// Bounded retry cap for code generation. At 4-digit width this fails only
/// when the table holds nearly all 10,000 codes.
const MAX_CODE_ATTEMPTS: usize = 1_000;

/// Creates, looks up, and tears down rooms. Cloneable; all clones share
/// one table.
#[derive(Clone)]
pub struct RoomRegistry {
    inner: Arc<Inner>,
}

struct Inner {
    config: RoomConfig,
    rooms: Mutex<HashMap<RoomCode, RoomHandle>>,
}

impl RoomRegistry {
    /// Creates an empty registry; every room it spawns uses `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                rooms: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Creates a room in the waiting state and returns its code.
    pub async fn create_room(&self) -> Result<RoomCode, RoomError> {
        let mut rooms = self.inner.rooms.lock().await;
        let code = generate_code(&rooms, self.inner.config.code_width)?;
        let handle = spawn_room(code.clone(), self.inner.config.clone());
        rooms.insert(code.clone(), handle);
        tracing::info!(room = %code, rooms = rooms.len(), "room created");
        Ok(code)
    }

    /// Returns a snapshot of the room, or `NotFound`.
    pub async fn room_snapshot(&self, code: &RoomCode) -> Result<RoomSnapshot, RoomError> {
        let handle = self.lookup(code).await?;
        self.reap_on_unavailable(code, handle.snapshot().await).await
    }

    /// Attaches a connection to a room's broadcast hub.
    pub async fn connect(
        &self,
        code: &RoomCode,
        sender: EventSender,
    ) -> Result<ConnectionId, RoomError> {
        let handle = self.lookup(code).await?;
        self.reap_on_unavailable(code, handle.connect(sender).await)
            .await
    }

    /// Detaches a connection. A missing room is a no-op: disconnects race
    /// room teardown by design.
    pub async fn disconnect(&self, code: &RoomCode, conn: ConnectionId) {
        let handle = { self.inner.rooms.lock().await.get(code).cloned() };
        if let Some(handle) = handle {
            let _ = handle.disconnect(conn).await;
        }
    }

    /// Adds a player to a room. The returned `ConnectionId` identifies the
    /// attached `sender` for later `relay_draw` calls.
    pub async fn join_room(
        &self,
        code: &RoomCode,
        name: impl Into<String>,
        sender: EventSender,
    ) -> Result<(PlayerId, ConnectionId), RoomError> {
        let handle = self.lookup(code).await?;
        self.reap_on_unavailable(code, handle.join(name.into(), sender).await)
            .await
    }

    /// Removes a player; destroys the room if they were the last one.
    pub async fn leave_room(&self, code: &RoomCode, player: PlayerId) -> Result<(), RoomError> {
        let handle = self.lookup(code).await?;
        let emptied = self
            .reap_on_unavailable(code, handle.leave(player).await)
            .await?;
        if emptied {
            self.remove(code).await;
            tracing::info!(room = %code, "last player left, room destroyed");
        }
        Ok(())
    }

    /// Starts the game in a room.
    pub async fn start_game(&self, code: &RoomCode) -> Result<(), RoomError> {
        let handle = self.lookup(code).await?;
        self.reap_on_unavailable(code, handle.start().await).await
    }

    /// Ends the game and destroys the room. `NotFound` if the caller named
    /// an absent room; internal cleanup paths go through [`Self::remove`]
    /// instead, which is idempotent.
    pub async fn end_game(&self, code: &RoomCode) -> Result<(), RoomError> {
        let handle = {
            let mut rooms = self.inner.rooms.lock().await;
            rooms
                .remove(code)
                .ok_or_else(|| RoomError::NotFound(code.clone()))?
        };
        // The actor may already have stopped on its own; either way the
        // entry is gone and its timer cannot fire again.
        let _ = handle.end().await;
        tracing::info!(room = %code, "game ended");
        Ok(())
    }

    /// Forces the next round to start, as a correct guess would but with
    /// no score change or word reveal.
    pub async fn next_round(&self, code: &RoomCode) -> Result<(), RoomError> {
        let handle = self.lookup(code).await?;
        self.reap_on_unavailable(code, handle.next_round().await)
            .await
    }

    /// Submits a guess on behalf of a player. Returns whether it matched.
    pub async fn submit_guess(
        &self,
        code: &RoomCode,
        player: PlayerId,
        text: impl Into<String>,
    ) -> Result<bool, RoomError> {
        let handle = self.lookup(code).await?;
        self.reap_on_unavailable(code, handle.guess(player, text.into()).await)
            .await
    }

    /// Relays an opaque drawing payload to every connection in the room
    /// except the sending one.
    pub async fn relay_draw(
        &self,
        code: &RoomCode,
        sender: ConnectionId,
        payload: serde_json::Value,
    ) -> Result<(), RoomError> {
        let handle = self.lookup(code).await?;
        self.reap_on_unavailable(code, handle.draw(sender, payload).await)
            .await
    }

    /// Number of active rooms.
    pub async fn room_count(&self) -> usize {
        self.inner.rooms.lock().await.len()
    }

    /// Codes of all active rooms.
    pub async fn room_codes(&self) -> Vec<RoomCode> {
        self.inner.rooms.lock().await.keys().cloned().collect()
    }

    async fn lookup(&self, code: &RoomCode) -> Result<RoomHandle, RoomError> {
        self.inner
            .rooms
            .lock()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(code.clone()))
    }

    /// Idempotent removal used by internal cleanup.
    async fn remove(&self, code: &RoomCode) {
        self.inner.rooms.lock().await.remove(code);
    }

    /// A room whose actor has stopped reads as absent to callers; sweep
    /// its stale entry on the way out.
    async fn reap_on_unavailable<T>(
        &self,
        code: &RoomCode,
        result: Result<T, RoomError>,
    ) -> Result<T, RoomError> {
        if let Err(RoomError::Unavailable(_)) = &result {
            self.remove(code).await;
            tracing::debug!(room = %code, "swept stopped room");
            return Err(RoomError::NotFound(code.clone()));
        }
        result
    }
}

/// Generates an unpredictable fixed-width numeric code not currently in
/// use, with a bounded retry loop.
fn generate_code(
    rooms: &HashMap<RoomCode, RoomHandle>,
    width: usize,
) -> Result<RoomCode, RoomError> {
    let mut rng = rand::rng();
    // u64 holds at most 19 decimal digits; wider configs have no
    // representable code space.
    let space = 10u64
        .checked_pow(width as u32)
        .ok_or(RoomError::CodeSpaceExhausted)?;
    for _ in 0..MAX_CODE_ATTEMPTS {
        let n = rng.random_range(0..space);
        let code = RoomCode(format!("{n:0width$}"));
        if !rooms.contains_key(&code) {
            return Ok(code);
        }
    }
    Err(RoomError::CodeSpaceExhausted)
}
