//! Session management for the Padlink client.
//!
//! This crate owns the connection lifecycle against a single
//! controller-distribution server:
//!
//! 1. **Connection** — connect, transport confirmation, disconnect and
//!    teardown discipline ([`Session`])
//! 2. **Identity** — the server-pushed handshake and the authoritative
//!    player [`Roster`], plus the optional login exchange
//! 3. **Dispatch** — the tag-keyed receive step that turns wire packets
//!    into [`SessionEvent`]s
//!
//! # How it fits in the stack
//!
//! ```text
//! Run loop (above)  ← matches on SessionEvents, streams input
//!     ↕
//! Session layer (this crate)  ← state machine, roster, dispatch
//!     ↕
//! Protocol/Transport (below)  ← framing, codecs, the peer itself
//! ```

mod config;
mod error;
mod event;
mod roster;
mod session;

pub use config::SessionConfig;
pub use error::SessionError;
pub use event::SessionEvent;
pub use roster::{Player, Roster};
pub use session::{Session, SessionState};
