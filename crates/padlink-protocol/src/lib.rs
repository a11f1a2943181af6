//! Wire protocol for Padlink.
//!
//! This crate defines the language spoken between the input client and the
//! controller-distribution server:
//!
//! - **Framing** ([`Tag`], [`encode_frame`], [`decode_frame`]) — the
//!   5-byte-tag packet format.
//! - **Types** ([`Handshake`], [`LoginRequest`], [`InputState`], etc.) —
//!   the typed messages behind each tag.
//! - **Codec** ([`Codec`] trait, [`BincodeCodec`]) — how payloads become
//!   bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing either.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (whole-message byte buffers)
//! and session (connection and login state). It is pure and stateless: no
//! I/O, no knowledge of peers or rosters.
//!
//! ```text
//! Transport (bytes) → Protocol (tag + message) → Session (state machine)
//! ```

mod codec;
mod error;
mod frame;
mod types;

pub use codec::{BincodeCodec, Codec};
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use frame::{TAG_LEN, Tag, decode_frame, encode_frame};
pub use types::{
    GameControl, Handshake, InputState, LoginOutcome, LoginRequest,
    LoginResponse, PlayerEntry, PlayerId,
};
