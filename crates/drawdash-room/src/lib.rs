//! Room session engine for Drawdash.
//!
//! Each room is an isolated Tokio task (actor model) owning its players,
//! round state, countdown timer, and broadcast hub. Commands and timer
//! ticks are serialized through the actor's channel, so concurrent guesses,
//! leaves, and timer expiries apply in a single total order per room while
//! rooms stay independent of each other.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates/destroys rooms, routes every inbound
//!   command (the transport layer's entry point)
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`BroadcastHub`] — a room's live connections and event fan-out
//! - [`RoomConfig`] — round duration, player limits, word list
//! - [`RoomError`] — what can go wrong

mod config;
mod error;
mod hub;
mod registry;
mod round;
mod session;

pub use config::RoomConfig;
pub use error::RoomError;
pub use hub::{BroadcastHub, EventSender};
pub use registry::RoomRegistry;
pub use session::RoomHandle;
