//! Wire contract for Drawdash.
//!
//! This crate defines what travels between the room engine and its clients:
//!
//! - **Types** ([`ServerEvent`], [`RoomSnapshot`], [`Player`], the id
//!   newtypes) — the structures the engine broadcasts.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — how a transport turns those
//!   structures into bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! It knows nothing about rooms, timers, or connections; it only describes
//! shapes. The room engine depends on it, and so does whatever transport
//! layer fronts the engine.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    ConnectionId, Player, PlayerId, RoomCode, RoomSnapshot, RoomStatus, ServerEvent,
};
