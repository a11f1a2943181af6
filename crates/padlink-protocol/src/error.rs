//! Error types for the protocol layer.
//!
//! Each crate in Padlink defines its own error enum, so a `ProtocolError`
//! always means the problem is in framing or serialization, not in the
//! transport or the session state machine.

use crate::Tag;

/// Errors that can occur while framing or (de)serializing packets.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The buffer is too short to contain the 5-byte tag.
    ///
    /// Raised by [`decode_frame`](crate::decode_frame) before any payload
    /// work happens. The session logs and discards such packets.
    #[error("malformed packet: {len} bytes is shorter than a tag")]
    MalformedPacket {
        /// Length of the offending buffer.
        len: usize,
    },

    /// Serializing a message into payload bytes failed.
    #[error("encode failed: {0}")]
    Encode(#[source] bincode::Error),

    /// The payload did not decode as the message its tag promises.
    ///
    /// Carries the offending tag so the discard can be attributed in logs.
    #[error("payload decode failed for tag {tag}: {source}")]
    PayloadDecode {
        /// Tag under which the payload was being decoded.
        tag: Tag,
        #[source]
        source: bincode::Error,
    },

    /// Serializing a message with the JSON debug codec failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    EncodeJson(#[source] serde_json::Error),

    /// The payload did not decode as JSON for the given tag.
    #[cfg(feature = "json")]
    #[error("payload decode failed for tag {tag}: {source}")]
    PayloadDecodeJson {
        /// Tag under which the payload was being decoded.
        tag: Tag,
        #[source]
        source: serde_json::Error,
    },
}
