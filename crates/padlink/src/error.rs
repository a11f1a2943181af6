//! Unified error type for the Padlink client stack.

use padlink_protocol::ProtocolError;
use padlink_session::SessionError;
use padlink_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `padlink` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PadlinkError {
    /// A transport-level error (connect, send, service).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (framing, encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (no route, wrong lifecycle state).
    #[error(transparent)]
    Session(#[from] SessionError),
}
