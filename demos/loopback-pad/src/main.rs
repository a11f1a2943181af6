//! Loopback demo: a Padlink client against an in-process fake server.
//!
//! A scripted pad presses and releases the Action button while the client
//! streams delta-encoded input to a server running on the other end of a
//! memory endpoint pair. The outer loop in `main` restarts the whole
//! connect/run cycle, the way a real deployment retries after a session
//! ends.
//!
//! Run with `RUST_LOG=debug` to watch the packet traffic.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use padlink::prelude::*;
use padlink_protocol::{
    BincodeCodec, Codec, Handshake, InputState, LoginRequest, LoginResponse,
    PlayerEntry, Tag, decode_frame, encode_frame,
};
use padlink_transport::{Delivery, Endpoint, MemoryEndpoint, TransportEvent};
use tracing::info;

// ---------------------------------------------------------------------------
// Scripted input source
// ---------------------------------------------------------------------------

/// A pad whose Action value the main loop scripts; everything else is 0.
struct DemoPad {
    action: Arc<AtomicI32>,
}

impl InputSource for DemoPad {
    fn control_state(
        &mut self,
        _player: PlayerId,
        control: GameControl,
    ) -> i32 {
        if control == GameControl::Action {
            self.action.load(Ordering::Relaxed)
        } else {
            0
        }
    }

    fn roster_changed(&mut self, player_count: usize) {
        info!(player_count, "pad ready");
    }
}

// ---------------------------------------------------------------------------
// Fake server
// ---------------------------------------------------------------------------

/// Serves one session: pushes a handshake on connect, accepts any login,
/// logs the input stream, and acknowledges the final graceful close.
async fn run_server(mut endpoint: MemoryEndpoint) -> Result<(), PadlinkError> {
    let codec = BincodeCodec;

    loop {
        let Some(event) =
            endpoint.service(Duration::from_millis(10)).await?
        else {
            continue;
        };
        match event {
            TransportEvent::Connected(p) => {
                let handshake = Handshake {
                    name: "loopback-cabinet".into(),
                    players: vec![PlayerEntry {
                        id: PlayerId(1),
                        username: "alice".into(),
                        active: true,
                    }],
                };
                let payload = codec.encode(&handshake)?;
                endpoint
                    .send(
                        p,
                        &encode_frame(Tag::HANDSHAKE, &payload),
                        Delivery::Reliable,
                    )
                    .await?;
            }
            TransportEvent::Received { peer: p, data } => {
                let Ok((tag, payload)) = decode_frame(&data) else {
                    continue;
                };
                match tag {
                    Tag::LOGIN_REQUEST => {
                        let request: LoginRequest =
                            codec.decode(tag, payload)?;
                        info!(username = %request.username, "server: login");
                        let response =
                            codec.encode(&LoginResponse { code: 0 })?;
                        endpoint
                            .send(
                                p,
                                &encode_frame(Tag::LOGIN_RESPONSE, &response),
                                Delivery::Reliable,
                            )
                            .await?;
                    }
                    Tag::INPUT => {
                        let input: InputState = codec.decode(tag, payload)?;
                        info!(
                            player = %input.player,
                            control = ?input.control,
                            value = input.value,
                            "server: input"
                        );
                    }
                    _ => {}
                }
            }
            TransportEvent::Disconnected(p) => {
                info!(peer = %p, "server: client left");
                return Ok(());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// One client cycle
// ---------------------------------------------------------------------------

async fn run_cycle() -> Result<(), PadlinkError> {
    let (client_end, server_end) = MemoryEndpoint::pair();
    let server = tokio::spawn(run_server(server_end));

    let action = Arc::new(AtomicI32::new(0));
    let pad = DemoPad {
        action: action.clone(),
    };
    let session = Session::new(client_end, SessionConfig::default());
    let mut client = Client::new(session, pad);

    client.connect("loopback", 0).await?;

    for step in 0u32..200 {
        // Hold Action for a stretch of the run, then let go. The delta
        // gate turns all of this into exactly two INPUT packets.
        let pressed = (40..120).contains(&step);
        action.store(i32::from(pressed), Ordering::Relaxed);

        match client.tick().await? {
            Some(SessionEvent::HandshakeCompleted) => {
                info!(
                    server = client.session().server_name().unwrap_or("?"),
                    "handshake done — logging in"
                );
                client.login("alice", "", Some(1)).await?;
            }
            Some(SessionEvent::LoginResult(outcome)) => {
                info!(%outcome, "login finished");
            }
            Some(SessionEvent::Disconnected) => break,
            _ => {}
        }
    }

    client.disconnect().await;
    server
        .await
        .expect("server task panicked")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), PadlinkError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // The library never retries on its own; the restart policy lives out
    // here, around whole connect/run cycles.
    for attempt in 1u32..=2 {
        info!(attempt, "starting client cycle");
        run_cycle().await?;
    }
    Ok(())
}
