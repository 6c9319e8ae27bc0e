//! Error types for the room layer.

use drawdash_protocol::{PlayerId, RoomCode};

/// Errors that can occur during room operations.
///
/// Nothing here is fatal to the process; every variant is scoped to one
/// room or one caller.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The referenced player is not in the room.
    #[error("player {0} not found in room {1}")]
    PlayerNotFound(PlayerId, RoomCode),

    /// No player slots left.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// Not enough players to start the game.
    #[error("need {need} players to start, have {have}")]
    InsufficientPlayers { have: usize, need: usize },

    /// The room is in a state that doesn't allow this operation, e.g.
    /// guessing before the game has started.
    #[error("invalid room state for this operation: {0}")]
    InvalidState(String),

    /// The room's actor has stopped; its command channel is closed. The
    /// registry converts this to [`RoomError::NotFound`] at its boundary.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),

    /// Code generation could not find a free code within the retry cap.
    /// Practically unreachable at 4-digit width with a small room count.
    #[error("room code space exhausted")]
    CodeSpaceExhausted,
}
