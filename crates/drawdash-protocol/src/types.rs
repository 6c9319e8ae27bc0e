//! Core wire types: identifiers, snapshots, and the outbound event contract.
//!
//! Snapshot fields serialize as snake_case (`is_drawing`, `current_word`),
//! event data fields as camelCase (`playerId`, `timeRemaining`), following
//! the shapes the original clients consume. The room snapshot diverges from
//! that wire format in two ways: the redundant `scores` map is dropped
//! (each player carries their own `score`) and a `status` field is added.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identifier, unique within one room and never reused there.
///
/// Ids are short decimal strings ("1", "2", ...) minted from a per-room
/// monotonic counter. A player who leaves does not free their id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A room's join code: a fixed-width decimal string, unique among rooms
/// that are currently active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(pub String);

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one live client connection within a room's broadcast hub.
///
/// Connections are not players: a client may connect (and receive events)
/// before joining, and a player's connection outlives their membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One player's view-facing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Exactly one player has this set while a round is running; none
    /// before the first round starts.
    pub is_drawing: bool,
    pub score: u32,
}

/// The lifecycle state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Room exists, game not started. Accepting joins.
    Waiting,
    /// A round is in progress. Late joins are still allowed.
    Active,
    /// Terminal. No further mutation is accepted.
    Ended,
}

impl RoomStatus {
    /// Returns `true` if new players may join in this state.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Waiting | Self::Active)
    }

    /// Returns `true` if a round is running.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` for the terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Active => write!(f, "active"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// A full room snapshot as broadcast to clients.
///
/// `players` is ordered by join; that order drives drawer rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub code: RoomCode,
    pub players: Vec<Player>,
    /// Starts at 0, increments on every round start.
    pub current_round: u32,
    /// Empty when no round is active. In broadcast events this field is
    /// redacted per recipient: only the drawer's connection sees the word.
    pub current_word: String,
    /// Seconds left in the current round.
    pub time_remaining: u32,
    pub status: RoomStatus,
}

// ---------------------------------------------------------------------------
// Outbound events
// ---------------------------------------------------------------------------

/// Everything a room broadcasts to its connections.
///
/// Serializes as `{"type": "<tag>", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A player joined the room.
    PlayerJoined { player: Player },

    /// A player left the room.
    PlayerLeft {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
    },

    /// The game started; announces round 1.
    GameStart {
        room: RoomSnapshot,
        /// The secret word for the drawer's connection, empty for everyone
        /// else.
        #[serde(rename = "currentWord")]
        current_word: String,
    },

    /// A round transition: announces the *new* round (the tag is historic,
    /// clients key on it).
    RoundEnd {
        room: RoomSnapshot,
        #[serde(rename = "currentWord")]
        current_word: String,
    },

    /// One-per-second countdown update.
    TimeUpdate {
        #[serde(rename = "timeRemaining")]
        time_remaining: u32,
    },

    /// Verdict on a submitted guess. The guessed text is never echoed;
    /// `word` is revealed only on a correct guess.
    Guess {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        correct: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        word: Option<String>,
    },

    /// An opaque drawing payload, relayed verbatim to every connection
    /// except the one that sent it.
    Draw(serde_json::Value),
}
