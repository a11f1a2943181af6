//! Codec trait and implementations for payload (de)serialization.
//!
//! A codec converts between typed messages and payload bytes. The framing
//! layer never looks inside a payload; the session picks one codec and
//! uses it for every tag. [`BincodeCodec`] is the wire format; `JsonCodec`
//! (behind the `json` feature) trades compactness for payloads that can be
//! read straight out of a packet capture.

use serde::{Serialize, de::DeserializeOwned};

use crate::{ProtocolError, Tag};

/// Encodes typed messages to payload bytes and back.
///
/// `decode` takes the tag the payload arrived under so failures can name
/// the packet kind they belong to — a payload that fails to decode is
/// attributed and discarded, never fatal.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message into payload bytes.
    ///
    /// # Errors
    /// Returns an encode error if the value cannot be represented in this
    /// format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes payload bytes into a message.
    ///
    /// # Errors
    /// Returns [`ProtocolError::PayloadDecode`] (carrying `tag`) if the
    /// bytes are malformed, truncated, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        tag: Tag,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// BincodeCodec
// ---------------------------------------------------------------------------

/// The production codec: compact schema-based binary via `bincode`.
///
/// Field order is the schema; optional fields cost one presence byte when
/// absent instead of a zero-filled value.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        bincode::serialize(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        tag: Tag,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        bincode::deserialize(data)
            .map_err(|source| ProtocolError::PayloadDecode { tag, source })
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A human-readable debug codec (feature `json`).
///
/// Not the wire format — both ends must agree on the codec, and the
/// reference servers speak bincode. Useful when eyeballing traffic during
/// protocol work.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::EncodeJson)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        tag: Tag,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data)
            .map_err(|source| ProtocolError::PayloadDecodeJson { tag, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GameControl, Handshake, InputState, LoginRequest, LoginResponse,
        PlayerEntry, PlayerId,
    };

    fn sample_handshake() -> Handshake {
        Handshake {
            name: "arcade-cabinet".into(),
            players: vec![
                PlayerEntry {
                    id: PlayerId(1),
                    username: "alice".into(),
                    active: true,
                },
                PlayerEntry {
                    id: PlayerId(2),
                    username: "bob".into(),
                    active: false,
                },
            ],
        }
    }

    #[test]
    fn test_handshake_round_trip() {
        let codec = BincodeCodec;
        let message = sample_handshake();
        let bytes = codec.encode(&message).unwrap();
        let decoded: Handshake =
            codec.decode(Tag::HANDSHAKE, &bytes).unwrap();
        assert_eq!(message, decoded);
    }

    #[test]
    fn test_login_request_round_trip_with_all_fields() {
        let codec = BincodeCodec;
        let message = LoginRequest {
            username: "alice".into(),
            password: Some("hunter2".into()),
            user_id: Some(1),
        };
        let bytes = codec.encode(&message).unwrap();
        let decoded: LoginRequest =
            codec.decode(Tag::LOGIN_REQUEST, &bytes).unwrap();
        assert_eq!(message, decoded);
    }

    #[test]
    fn test_login_request_absent_fields_shrink_the_payload() {
        // Absent optionals are encoded as absence, not as zero-filled
        // values, so the bare request is strictly smaller.
        let codec = BincodeCodec;
        let bare = codec
            .encode(&LoginRequest {
                username: "alice".into(),
                password: None,
                user_id: None,
            })
            .unwrap();
        let full = codec
            .encode(&LoginRequest {
                username: "alice".into(),
                password: Some(String::new()),
                user_id: Some(0),
            })
            .unwrap();
        assert!(bare.len() < full.len());
    }

    #[test]
    fn test_login_response_round_trip() {
        let codec = BincodeCodec;
        let message = LoginResponse { code: 3 };
        let bytes = codec.encode(&message).unwrap();
        let decoded: LoginResponse =
            codec.decode(Tag::LOGIN_RESPONSE, &bytes).unwrap();
        assert_eq!(message, decoded);
    }

    #[test]
    fn test_input_state_round_trip() {
        let codec = BincodeCodec;
        let message = InputState {
            player: PlayerId(3),
            control: GameControl::Button4,
            value: -7,
        };
        let bytes = codec.encode(&message).unwrap();
        let decoded: InputState = codec.decode(Tag::INPUT, &bytes).unwrap();
        assert_eq!(message, decoded);
    }

    #[test]
    fn test_decode_garbage_names_the_tag() {
        let codec = BincodeCodec;
        let err = codec
            .decode::<Handshake>(Tag::HANDSHAKE, &[0xff, 0xff, 0xff])
            .unwrap_err();
        match err {
            ProtocolError::PayloadDecode { tag, .. } => {
                assert_eq!(tag, Tag::HANDSHAKE);
            }
            other => panic!("expected PayloadDecode, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_truncated_payload_fails() {
        let codec = BincodeCodec;
        let bytes = codec.encode(&sample_handshake()).unwrap();
        let result: Result<Handshake, _> =
            codec.decode(Tag::HANDSHAKE, &bytes[..bytes.len() / 2]);
        assert!(result.is_err());
    }
}
