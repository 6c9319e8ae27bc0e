//! Round progression: word selection, drawer rotation, guess matching.
//!
//! Pure bookkeeping over the player list; the room actor drives it and
//! handles timers and broadcasts around it.

use drawdash_protocol::Player;
use rand::seq::IndexedRandom;

/// Owns the word list and the rotation rule.
pub(crate) struct RoundEngine {
    words: Vec<String>,
}

impl RoundEngine {
    pub(crate) fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Picks an unpredictable word for the next round. Empty when the word
    /// list is empty.
    pub(crate) fn pick_word(&self) -> String {
        let mut rng = rand::rng();
        self.words.choose(&mut rng).cloned().unwrap_or_default()
    }

    /// Advances the drawer one position in join order and returns the new
    /// drawer's index, or `None` when there are no players.
    ///
    /// Rotation is strictly order-based: `(current + 1) % len`, with the
    /// first round (no current drawer) starting at index 0. A player who
    /// joined mid-game is at the end of the list and so last in rotation.
    pub(crate) fn rotate_drawer(players: &mut [Player]) -> Option<usize> {
        if players.is_empty() {
            return None;
        }
        let current = players.iter().position(|p| p.is_drawing);
        let next = current.map_or(0, |i| (i + 1) % players.len());
        for player in players.iter_mut() {
            player.is_drawing = false;
        }
        players[next].is_drawing = true;
        Some(next)
    }

    /// Case-insensitive guess check. A room left wordless (round never
    /// started) matches nothing.
    pub(crate) fn is_match(word: &str, guess: &str) -> bool {
        !word.is_empty() && word.eq_ignore_ascii_case(guess)
    }
}
