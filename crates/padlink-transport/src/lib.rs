//! Transport abstraction layer for Padlink.
//!
//! Provides the [`Endpoint`] trait: a client-side, single-peer channel with
//! unreliable-by-default delivery and a per-packet [`Delivery`] flag. The
//! model is a polled event pump — `connect` starts an attempt, and every
//! confirmation (connected, disconnected, data) arrives through
//! [`Endpoint::service`] with a bounded wait, so one cooperative loop can
//! interleave transport work with input sampling.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket endpoint via `tokio-tungstenite`
//!
//! The in-process [`MemoryEndpoint`] is always available and backs the
//! integration tests and the loopback demo.

#![allow(async_fn_in_trait)]

mod error;
mod memory;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use memory::MemoryEndpoint;
#[cfg(feature = "websocket")]
pub use websocket::WsEndpoint;

use std::fmt;
use std::time::Duration;

/// Opaque identifier for a connected peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(u64);

impl PeerId {
    /// Creates a new `PeerId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Per-packet delivery guarantee.
///
/// The channel is unreliable by default; packets whose loss is not
/// acceptable are flagged [`Reliable`](Delivery::Reliable). Endpoints that
/// only offer reliable delivery may upgrade `Unreliable` sends, but must
/// never downgrade `Reliable` ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    /// Eventual, ordered, non-duplicated arrival.
    #[default]
    Reliable,
    /// Best effort; may be dropped.
    Unreliable,
}

/// An event produced by [`Endpoint::service`].
///
/// Connect/disconnect events are out-of-band from application packets:
/// they describe the channel itself, not its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The outbound connection attempt was confirmed by the remote end.
    Connected(PeerId),
    /// The peer is gone — graceful close acknowledged, remote close, or
    /// the channel dropped out from under us.
    Disconnected(PeerId),
    /// A whole message arrived from the peer.
    Received {
        /// The peer it came from.
        peer: PeerId,
        /// The complete packet bytes.
        data: Vec<u8>,
    },
}

/// A client-side transport endpoint with a single outbound peer slot.
///
/// Mirrors the lifecycle the session needs: connect once, pump events with
/// a bounded wait, send tagged packets with a delivery flag, close
/// gracefully, and — when the graceful path fails — release the peer
/// forcibly with the synchronous [`reset`](Endpoint::reset), which must be
/// callable from any teardown path and idempotent.
pub trait Endpoint: Send + 'static {
    /// Starts a connection attempt to the given host and port.
    ///
    /// Returns the peer handle for the attempt; the confirmation arrives
    /// later as [`TransportEvent::Connected`] from [`service`](Self::service).
    ///
    /// # Errors
    /// [`TransportError::NoPeerSlot`] if the endpoint already holds a peer;
    /// [`TransportError::ConnectFailed`] if the attempt cannot be started.
    async fn connect(
        &mut self,
        host: &str,
        port: u16,
    ) -> Result<PeerId, TransportError>;

    /// Pumps the next transport event, waiting at most `wait`.
    ///
    /// Returns `Ok(None)` when nothing happened within the wait. Endpoint
    /// implementations surface a dead connection as
    /// [`TransportEvent::Disconnected`] rather than an error wherever they
    /// can tell the difference.
    async fn service(
        &mut self,
        wait: Duration,
    ) -> Result<Option<TransportEvent>, TransportError>;

    /// Sends one whole message to the peer.
    async fn send(
        &mut self,
        peer: PeerId,
        data: &[u8],
        delivery: Delivery,
    ) -> Result<(), TransportError>;

    /// Requests a graceful close. The acknowledgment arrives as
    /// [`TransportEvent::Disconnected`]; the peer slot stays occupied until
    /// then (or until [`reset`](Self::reset)).
    async fn disconnect(&mut self, peer: PeerId) -> Result<(), TransportError>;

    /// Forcibly releases the peer. Synchronous and idempotent: resetting a
    /// peer that is already gone does nothing.
    fn reset(&mut self, peer: PeerId);
}
