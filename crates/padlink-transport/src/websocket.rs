//! WebSocket endpoint implementation using `tokio-tungstenite`.
//!
//! WebSocket gives exactly the message discipline the framing layer
//! assumes — whole binary messages, never partial reads. Delivery is
//! always reliable over the underlying TCP stream, so `Unreliable` sends
//! are carried reliably too, which the [`Delivery`] contract permits.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_tungstenite::tungstenite::Message;

use crate::{Delivery, Endpoint, PeerId, TransportError, TransportEvent};

/// Counter for generating unique peer IDs.
static NEXT_PEER_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A client-side WebSocket [`Endpoint`] with one outbound peer slot.
pub struct WsEndpoint {
    peer: Option<PeerId>,
    stream: Option<WsStream>,
    pending: VecDeque<TransportEvent>,
}

impl WsEndpoint {
    /// Creates an idle endpoint with an empty peer slot.
    pub fn new() -> Self {
        Self {
            peer: None,
            stream: None,
            pending: VecDeque::new(),
        }
    }

    /// The currently held peer, if any.
    pub fn peer(&self) -> Option<PeerId> {
        self.peer
    }

    fn drop_peer(&mut self) -> Option<TransportEvent> {
        self.stream = None;
        self.peer.take().map(TransportEvent::Disconnected)
    }
}

impl Default for WsEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl Endpoint for WsEndpoint {
    async fn connect(
        &mut self,
        host: &str,
        port: u16,
    ) -> Result<PeerId, TransportError> {
        if self.peer.is_some() {
            return Err(TransportError::NoPeerSlot);
        }

        let url = format!("ws://{host}:{port}");
        tracing::debug!(%url, "dialing");
        let (stream, _response) = tokio_tungstenite::connect_async(&url)
            .await
            .map_err(|e| {
                TransportError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;

        let peer =
            PeerId::new(NEXT_PEER_ID.fetch_add(1, Ordering::Relaxed));
        self.peer = Some(peer);
        self.stream = Some(stream);
        // The dial completed here, but confirmation still flows through
        // service so the caller sees one event order on every endpoint.
        self.pending.push_back(TransportEvent::Connected(peer));
        Ok(peer)
    }

    async fn service(
        &mut self,
        wait: Duration,
    ) -> Result<Option<TransportEvent>, TransportError> {
        use futures_util::StreamExt;

        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }
        let Some(stream) = self.stream.as_mut() else {
            // Nothing to pump; honor the bounded wait so callers don't spin.
            tokio::time::sleep(wait).await;
            return Ok(None);
        };

        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let message =
                match tokio::time::timeout_at(deadline, stream.next()).await {
                    Err(_) => return Ok(None),
                    Ok(message) => message,
                };
            match message {
                Some(Ok(Message::Binary(data))) => {
                    let Some(peer) = self.peer else {
                        continue;
                    };
                    return Ok(Some(TransportEvent::Received {
                        peer,
                        data: data.into(),
                    }));
                }
                Some(Ok(Message::Text(text))) => {
                    let Some(peer) = self.peer else {
                        continue;
                    };
                    return Ok(Some(TransportEvent::Received {
                        peer,
                        data: text.as_bytes().to_vec(),
                    }));
                }
                // Close frame or stream end: the peer is gone either way.
                Some(Ok(Message::Close(_))) | None => {
                    return Ok(self.drop_peer());
                }
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "receive failed — dropping peer");
                    return Ok(self.drop_peer());
                }
            }
        }
    }

    async fn send(
        &mut self,
        peer: PeerId,
        data: &[u8],
        _delivery: Delivery,
    ) -> Result<(), TransportError> {
        use futures_util::SinkExt;

        if self.peer != Some(peer) {
            return Err(TransportError::UnknownPeer(peer));
        }
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        stream
            .send(Message::Binary(data.to_vec().into()))
            .await
            .map_err(|e| {
                TransportError::SendFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    e,
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
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        // Sends the close frame; the peer's close reply surfaces as a
        // Disconnected event from service.
        stream.close(None).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    fn reset(&mut self, peer: PeerId) {
        if self.peer == Some(peer) {
            // Dropping the stream aborts the TCP connection.
            self.stream = None;
            self.peer = None;
            tracing::debug!(%peer, "peer forcibly reset");
        }
    }
}
