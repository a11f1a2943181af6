//! # Padlink
//!
//! Network transport layer of a remote game-input client.
//!
//! Padlink keeps a session with a controller-distribution server: it
//! connects, receives the authoritative player roster from the server's
//! handshake push, optionally logs in, and streams per-player per-control
//! input state upstream — delta-encoded, so only changed values cost a
//! packet, and reliably delivered, so no change is ever lost.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use padlink::prelude::*;
//!
//! # async fn demo(source: impl InputSource) -> Result<(), PadlinkError> {
//! let session = Session::new(WsEndpoint::new(), SessionConfig::default());
//! let mut client = Client::new(session, source);
//! client.connect("127.0.0.1", 4000).await?;
//! client.run().await // ticks until the session disconnects
//! # }
//! ```

mod client;
mod error;

pub use client::Client;
pub use error::PadlinkError;

/// Everything commonly needed to build and run a client.
pub mod prelude {
    pub use padlink_input::{DeltaTracker, InputSource};
    pub use padlink_protocol::{GameControl, LoginOutcome, PlayerId};
    pub use padlink_session::{
        Session, SessionConfig, SessionEvent, SessionState,
    };
    pub use padlink_transport::MemoryEndpoint;
    #[cfg(feature = "websocket")]
    pub use padlink_transport::WsEndpoint;

    pub use crate::{Client, PadlinkError};
}
