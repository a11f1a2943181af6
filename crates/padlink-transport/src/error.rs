//! Error types for the transport layer.

use crate::PeerId;

/// Errors that can occur at a transport endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The endpoint's single outbound peer slot is already in use.
    #[error("no outbound peer slot available")]
    NoPeerSlot,

    /// The connection attempt failed outright.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// The peer handle doesn't belong to this endpoint (stale after a
    /// reset, or from another endpoint).
    #[error("unknown peer {0}")]
    UnknownPeer(PeerId),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The channel to the remote end is gone.
    #[error("connection closed")]
    Closed,
}
