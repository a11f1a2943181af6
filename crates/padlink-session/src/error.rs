//! Error types for the session layer.

use padlink_protocol::ProtocolError;
use padlink_transport::TransportError;

use crate::SessionState;

/// Errors that can occur while driving a session.
///
/// Only structural failures surface here — no peer, no transport, an
/// operation called in the wrong lifecycle state. Per-packet problems
/// (malformed frames, unknown tags, undecodable payloads) are logged and
/// discarded inside dispatch and never reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The transport could not open a peer slot toward the server.
    /// Fatal for this connection attempt; retry policy belongs to the
    /// caller's outer loop.
    #[error("no route to {host}:{port}: {source}")]
    NoRoute {
        host: String,
        port: u16,
        #[source]
        source: TransportError,
    },

    /// `connect` was called while a connection is already underway.
    #[error("connect requires an idle or disconnected session (state: {0})")]
    AlreadyActive(SessionState),

    /// `login` was called before the transport connection was confirmed.
    #[error("login requires a connected session (state: {0})")]
    NotConnected(SessionState),

    /// A transport operation on an established connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Encoding an outgoing packet failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
