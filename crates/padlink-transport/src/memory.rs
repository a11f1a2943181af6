//! In-process endpoint pair over tokio channels.
//!
//! [`MemoryEndpoint::pair`] returns two endpoints wired back to back, each
//! implementing the full connect/disconnect handshake so tests and the
//! loopback demo exercise the same lifecycle a networked endpoint has: a
//! connect attempt is confirmed by the remote end, a graceful close is
//! acknowledged by the remote end, and an unpumped remote simply never
//! acknowledges — which is exactly what teardown-timeout tests need.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::{
    UnboundedReceiver, UnboundedSender, unbounded_channel,
};
use tokio::time::timeout;

use crate::{Delivery, Endpoint, PeerId, TransportError, TransportEvent};

/// Counter for generating unique peer IDs.
static NEXT_PEER_ID: AtomicU64 = AtomicU64::new(1);

/// Control and data frames exchanged between the two ends of a pair.
#[derive(Debug)]
enum Frame {
    Connect,
    ConnectAck,
    Disconnect,
    DisconnectAck,
    Data(Vec<u8>),
}

/// One end of an in-process transport pair.
pub struct MemoryEndpoint {
    tx: UnboundedSender<Frame>,
    rx: UnboundedReceiver<Frame>,
    peer: Option<PeerId>,
    reset_count: u32,
}

impl MemoryEndpoint {
    /// Creates two endpoints wired to each other.
    pub fn pair() -> (MemoryEndpoint, MemoryEndpoint) {
        let (a_tx, b_rx) = unbounded_channel();
        let (b_tx, a_rx) = unbounded_channel();
        (Self::with_wires(a_tx, a_rx), Self::with_wires(b_tx, b_rx))
    }

    fn with_wires(
        tx: UnboundedSender<Frame>,
        rx: UnboundedReceiver<Frame>,
    ) -> Self {
        Self {
            tx,
            rx,
            peer: None,
            reset_count: 0,
        }
    }

    /// The currently held peer, if any.
    pub fn peer(&self) -> Option<PeerId> {
        self.peer
    }

    /// How many times a peer was forcibly released via [`Endpoint::reset`].
    ///
    /// Diagnostic counter; teardown tests assert on it.
    pub fn reset_count(&self) -> u32 {
        self.reset_count
    }

    fn push_frame(&self, frame: Frame) -> Result<(), TransportError> {
        self.tx.send(frame).map_err(|_| TransportError::Closed)
    }

    fn fresh_peer(&mut self) -> PeerId {
        let id = PeerId::new(NEXT_PEER_ID.fetch_add(1, Ordering::Relaxed));
        self.peer = Some(id);
        id
    }

    fn handle_frame(&mut self, frame: Frame) -> Option<TransportEvent> {
        match frame {
            Frame::Connect => {
                // The remote initiated; accept into our slot and confirm.
                if self.peer.is_some() {
                    tracing::debug!(
                        "connect frame while peer slot occupied — ignored"
                    );
                    return None;
                }
                let peer = self.fresh_peer();
                let _ = self.push_frame(Frame::ConnectAck);
                Some(TransportEvent::Connected(peer))
            }
            Frame::ConnectAck => {
                self.peer.map(TransportEvent::Connected)
            }
            Frame::Disconnect => {
                // Remote requested a graceful close; acknowledge it.
                let _ = self.push_frame(Frame::DisconnectAck);
                self.peer.take().map(TransportEvent::Disconnected)
            }
            Frame::DisconnectAck => {
                self.peer.take().map(TransportEvent::Disconnected)
            }
            Frame::Data(data) => {
                let peer = self.peer?;
                Some(TransportEvent::Received { peer, data })
            }
        }
    }
}

impl Endpoint for MemoryEndpoint {
    async fn connect(
        &mut self,
        _host: &str,
        _port: u16,
    ) -> Result<PeerId, TransportError> {
        // The pair is pre-wired; host and port are accepted for interface
        // parity and ignored.
        if self.peer.is_some() {
            return Err(TransportError::NoPeerSlot);
        }
        self.push_frame(Frame::Connect).map_err(|_| {
            TransportError::ConnectFailed(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "remote endpoint dropped",
            ))
        })?;
        Ok(self.fresh_peer())
    }

    async fn service(
        &mut self,
        wait: Duration,
    ) -> Result<Option<TransportEvent>, TransportError> {
        match timeout(wait, self.rx.recv()).await {
            Err(_) => Ok(None),
            // Channel gone: the remote end was dropped outright.
            Ok(None) => Ok(self.peer.take().map(TransportEvent::Disconnected)),
            Ok(Some(frame)) => Ok(self.handle_frame(frame)),
        }
    }

    async fn send(
        &mut self,
        peer: PeerId,
        data: &[u8],
        _delivery: Delivery,
    ) -> Result<(), TransportError> {
        // Both delivery modes are carried losslessly in process.
        if self.peer != Some(peer) {
            return Err(TransportError::UnknownPeer(peer));
        }
        self.push_frame(Frame::Data(data.to_vec())).map_err(|_| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "remote endpoint dropped",
            ))
        })
    }

    async fn disconnect(
        &mut self,
        peer: PeerId,
    ) -> Result<(), TransportError> {
        if self.peer != Some(peer) {
            return Err(TransportError::UnknownPeer(peer));
        }
        // Slot stays occupied until the DisconnectAck (or a reset).
        self.push_frame(Frame::Disconnect)
    }

    fn reset(&mut self, peer: PeerId) {
        if self.peer == Some(peer) {
            self.peer = None;
            self.reset_count += 1;
            tracing::debug!(%peer, "peer forcibly reset");
        }
    }
}
