//! The 5-byte tag framing scheme.
//!
//! Every wire packet is a 5-byte ASCII tag followed by the serialized
//! payload. The tag is the sole demultiplexing key; no length prefix is
//! needed because the transport delivers whole messages. Framing is pure
//! byte shuffling — payload interpretation belongs to the
//! [`Codec`](crate::Codec).

use std::fmt;

use crate::ProtocolError;

/// Length of a packet tag in bytes. Always exactly 5.
pub const TAG_LEN: usize = 5;

/// A 5-byte ASCII packet tag.
///
/// Known tags are provided as constants, but any 5-byte value is
/// representable: dispatch must be able to carry an unrecognized tag far
/// enough to log and discard it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; TAG_LEN]);

impl Tag {
    /// Server → client: authoritative roster push.
    pub const HANDSHAKE: Tag = Tag(*b"HANDS");
    /// Client → server: login request.
    pub const LOGIN_REQUEST: Tag = Tag(*b"LOGRQ");
    /// Server → client: login response code.
    pub const LOGIN_RESPONSE: Tag = Tag(*b"LOGRE");
    /// Client → server: one control's new value.
    pub const INPUT: Tag = Tag(*b"INPUT");

    /// Creates a tag from raw bytes.
    pub const fn new(bytes: [u8; TAG_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the tag's raw bytes.
    pub const fn as_bytes(&self) -> &[u8; TAG_LEN] {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tags are ASCII by convention; anything else prints escaped.
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{}\")", self.0.escape_ascii())
    }
}

/// Frames a packet: tag bytes followed by the payload bytes.
pub fn encode_frame(tag: Tag, payload: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(TAG_LEN + payload.len());
    buffer.extend_from_slice(tag.as_bytes());
    buffer.extend_from_slice(payload);
    buffer
}

/// Splits a packet into its tag and payload slice.
///
/// Zero-copy: the payload is a borrow into `buffer`.
///
/// # Errors
/// Returns [`ProtocolError::MalformedPacket`] if `buffer` is shorter than
/// [`TAG_LEN`].
pub fn decode_frame(buffer: &[u8]) -> Result<(Tag, &[u8]), ProtocolError> {
    if buffer.len() < TAG_LEN {
        return Err(ProtocolError::MalformedPacket { len: buffer.len() });
    }
    let (head, payload) = buffer.split_at(TAG_LEN);
    let mut bytes = [0u8; TAG_LEN];
    bytes.copy_from_slice(head);
    Ok((Tag::new(bytes), payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_are_five_ascii_bytes() {
        for tag in [
            Tag::HANDSHAKE,
            Tag::LOGIN_REQUEST,
            Tag::LOGIN_RESPONSE,
            Tag::INPUT,
        ] {
            assert_eq!(tag.as_bytes().len(), TAG_LEN);
            assert!(tag.as_bytes().is_ascii());
        }
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(Tag::HANDSHAKE.to_string(), "HANDS");
        assert_eq!(Tag::INPUT.to_string(), "INPUT");
    }

    #[test]
    fn test_encode_frame_concatenates() {
        let buffer = encode_frame(Tag::INPUT, &[1, 2, 3]);
        assert_eq!(&buffer[..5], b"INPUT");
        assert_eq!(&buffer[5..], &[1, 2, 3]);
    }

    #[test]
    fn test_round_trip_arbitrary_payload() {
        // decode(encode(tag, payload)) == (tag, payload) for any payload.
        for payload in [&[][..], &[0u8][..], &[0xff; 64][..]] {
            let tag = Tag::new(*b"XYZZY");
            let buffer = encode_frame(tag, payload);
            let (decoded_tag, decoded_payload) =
                decode_frame(&buffer).unwrap();
            assert_eq!(decoded_tag, tag);
            assert_eq!(decoded_payload, payload);
        }
    }

    #[test]
    fn test_decode_empty_payload() {
        let (tag, payload) = decode_frame(b"HANDS").unwrap();
        assert_eq!(tag, Tag::HANDSHAKE);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_decode_short_buffer_is_malformed() {
        for len in 0..TAG_LEN {
            let buffer = vec![b'A'; len];
            let err = decode_frame(&buffer).unwrap_err();
            assert!(matches!(
                err,
                ProtocolError::MalformedPacket { len: l } if l == len
            ));
        }
    }

    #[test]
    fn test_unrecognized_tag_is_representable() {
        let (tag, _) = decode_frame(b"WEIRD???").unwrap();
        assert_eq!(tag, Tag::new(*b"WEIRD"));
        assert_ne!(tag, Tag::HANDSHAKE);
    }
}
