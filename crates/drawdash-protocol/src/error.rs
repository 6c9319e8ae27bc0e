//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed input, missing fields, or a type
    /// mismatch.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
