//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Starter word list carried over from the original deployment.
const DEFAULT_WORDS: [&str; 10] = [
    "cat", "dog", "house", "tree", "sun", "moon", "star", "book", "chair", "table",
];

/// Configuration for a room instance. One copy is cloned into every room
/// the registry spawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Length of one round. The countdown ticks once per second for this
    /// many seconds.
    pub round_duration: Duration,

    /// Minimum players required before `start` succeeds.
    pub min_players: usize,

    /// Maximum players allowed in the room.
    pub max_players: usize,

    /// Digits in a generated room code.
    pub code_width: usize,

    /// Words the round engine picks from.
    pub words: Vec<String>,

    /// Capacity of a room actor's command channel. Senders wait when it
    /// fills (bounded backpressure).
    pub channel_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            round_duration: Duration::from_secs(60),
            min_players: 2,
            max_players: 4,
            code_width: 4,
            words: DEFAULT_WORDS.iter().map(|w| (*w).to_string()).collect(),
            channel_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.round_duration, Duration::from_secs(60));
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 4);
        assert_eq!(config.code_width, 4);
        assert_eq!(config.words.len(), 10);
    }
}
