//! Codec trait and the default JSON implementation.
//!
//! The engine itself never touches bytes; the transport layer picks a
//! [`Codec`] to frame events for its wire. [`JsonCodec`] matches the format
//! existing clients speak.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts between Rust types and raw bytes.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed or do
    /// not match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] producing the `{"type": ..., "data": ...}` JSON frames the
/// original clients consume.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlayerId, ServerEvent};

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec;
        let event = ServerEvent::Guess {
            player_id: PlayerId("3".into()),
            correct: true,
            word: Some("moon".into()),
        };
        let bytes = codec.encode(&event).unwrap();
        let decoded: ServerEvent = codec.decode(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        let codec = JsonCodec;
        let result: Result<ServerEvent, _> = codec.decode(b"{\"type\": \"nope\"");
        assert!(result.is_err());
    }
}
