//! Integration tests for the client run loop.
//!
//! A [`Client`] with a scripted input source talks to a fake server over
//! a memory endpoint pair, verifying the loop's observable traffic: one
//! initial sweep per handshake, silence under steady input, exactly one
//! packet per change, and slot invalidation when the roster shrinks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use padlink::prelude::*;
use padlink_protocol::{
    BincodeCodec, Codec, Handshake, InputState, PlayerEntry, Tag,
    decode_frame, encode_frame,
};
use padlink_transport::{
    Delivery, Endpoint, MemoryEndpoint, PeerId, TransportEvent,
};

const WAIT: Duration = Duration::from_millis(50);
const DRAIN_WAIT: Duration = Duration::from_millis(10);

fn test_config() -> SessionConfig {
    SessionConfig {
        poll_wait: Duration::from_millis(5),
        disconnect_wait: Duration::from_millis(100),
    }
}

// =========================================================================
// Scripted input source
// =========================================================================

/// An input source whose values the test sets from outside.
///
/// Unset (player, control) pairs read as 0, like a released button.
#[derive(Clone, Default)]
struct ScriptedSource {
    values: Arc<Mutex<HashMap<(PlayerId, GameControl), i32>>>,
    roster_sizes: Arc<Mutex<Vec<usize>>>,
}

impl ScriptedSource {
    fn set(&self, player: PlayerId, control: GameControl, value: i32) {
        self.values
            .lock()
            .unwrap()
            .insert((player, control), value);
    }

    fn roster_sizes(&self) -> Vec<usize> {
        self.roster_sizes.lock().unwrap().clone()
    }
}

impl InputSource for ScriptedSource {
    fn control_state(
        &mut self,
        player: PlayerId,
        control: GameControl,
    ) -> i32 {
        self.values
            .lock()
            .unwrap()
            .get(&(player, control))
            .copied()
            .unwrap_or(0)
    }

    fn roster_changed(&mut self, player_count: usize) {
        self.roster_sizes.lock().unwrap().push(player_count);
    }
}

// =========================================================================
// Fake server
// =========================================================================

struct FakeServer {
    endpoint: MemoryEndpoint,
    peer: Option<PeerId>,
    codec: BincodeCodec,
}

impl FakeServer {
    fn new(endpoint: MemoryEndpoint) -> Self {
        Self {
            endpoint,
            peer: None,
            codec: BincodeCodec,
        }
    }

    async fn accept(&mut self) {
        match self.endpoint.service(WAIT).await.unwrap() {
            Some(TransportEvent::Connected(peer)) => self.peer = Some(peer),
            other => panic!("expected a connect, got {other:?}"),
        }
    }

    async fn push_handshake(&mut self, players: &[(u32, &str)]) {
        let handshake = Handshake {
            name: "loop-test".into(),
            players: players
                .iter()
                .map(|&(id, username)| PlayerEntry {
                    id: PlayerId(id),
                    username: username.into(),
                    active: true,
                })
                .collect(),
        };
        let payload = self.codec.encode(&handshake).unwrap();
        let packet = encode_frame(Tag::HANDSHAKE, &payload);
        self.endpoint
            .send(self.peer.unwrap(), &packet, Delivery::Reliable)
            .await
            .unwrap();
    }

    /// Collects every queued `INPUT` packet until the channel runs dry.
    async fn drain_inputs(&mut self) -> Vec<InputState> {
        let mut inputs = Vec::new();
        while let Some(event) =
            self.endpoint.service(DRAIN_WAIT).await.unwrap()
        {
            match event {
                TransportEvent::Received { data, .. } => {
                    let (tag, payload) = decode_frame(&data).unwrap();
                    assert_eq!(tag, Tag::INPUT);
                    inputs.push(self.codec.decode(tag, payload).unwrap());
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        inputs
    }
}

/// A client whose session has connected and completed a handshake with
/// player 1, with the initial sweep already drained on the server.
async fn running_client() -> (
    Client<MemoryEndpoint, ScriptedSource>,
    ScriptedSource,
    FakeServer,
) {
    let (client_end, server_end) = MemoryEndpoint::pair();
    let source = ScriptedSource::default();
    let session = Session::new(client_end, test_config());
    let mut client = Client::new(session, source.clone());
    let mut server = FakeServer::new(server_end);

    client.connect("127.0.0.1", 4000).await.unwrap();
    server.accept().await;
    assert_eq!(
        client.tick().await.unwrap(),
        Some(SessionEvent::Connected)
    );

    server.push_handshake(&[(1, "alice")]).await;
    assert_eq!(
        client.tick().await.unwrap(),
        Some(SessionEvent::HandshakeCompleted)
    );

    // First sampling pass: every slot is fresh, so every control
    // transmits once even though all values read 0.
    client.tick().await.unwrap();
    let sweep = server.drain_inputs().await;
    assert_eq!(sweep.len(), GameControl::COUNT);

    (client, source, server)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_no_sampling_before_handshake() {
    let (client_end, server_end) = MemoryEndpoint::pair();
    let session = Session::new(client_end, test_config());
    let mut client = Client::new(session, ScriptedSource::default());
    let mut server = FakeServer::new(server_end);

    client.connect("127.0.0.1", 4000).await.unwrap();
    server.accept().await;
    client.tick().await.unwrap(); // Connected

    // Connected but not handshaken: ticks produce no input traffic.
    client.tick().await.unwrap();
    client.tick().await.unwrap();
    assert!(server.drain_inputs().await.is_empty());
}

#[tokio::test]
async fn test_initial_sweep_covers_every_control_in_order() {
    let (client_end, server_end) = MemoryEndpoint::pair();
    let session = Session::new(client_end, test_config());
    let mut client = Client::new(session, ScriptedSource::default());
    let mut server = FakeServer::new(server_end);

    client.connect("127.0.0.1", 4000).await.unwrap();
    server.accept().await;
    client.tick().await.unwrap();
    server.push_handshake(&[(1, "alice")]).await;
    client.tick().await.unwrap();

    client.tick().await.unwrap();
    let sweep = server.drain_inputs().await;
    let controls: Vec<GameControl> =
        sweep.iter().map(|input| input.control).collect();
    assert_eq!(controls, GameControl::ALL.to_vec());
    assert!(sweep.iter().all(|input| input.value == 0));
    assert!(sweep.iter().all(|input| input.player == PlayerId(1)));
}

#[tokio::test]
async fn test_steady_state_sends_nothing() {
    let (mut client, _source, mut server) = running_client().await;

    for _ in 0..5 {
        client.tick().await.unwrap();
    }
    assert!(server.drain_inputs().await.is_empty());
}

#[tokio::test]
async fn test_each_change_sends_exactly_one_packet() {
    let (mut client, source, mut server) = running_client().await;

    source.set(PlayerId(1), GameControl::Up, 1);
    client.tick().await.unwrap();
    client.tick().await.unwrap(); // same value again — suppressed

    let sent = server.drain_inputs().await;
    assert_eq!(
        sent,
        vec![InputState {
            player: PlayerId(1),
            control: GameControl::Up,
            value: 1,
        }]
    );

    // Release: one more packet, back to 0.
    source.set(PlayerId(1), GameControl::Up, 0);
    client.tick().await.unwrap();
    let sent = server.drain_inputs().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].value, 0);
}

#[tokio::test]
async fn test_source_learns_each_roster_size() {
    let (mut client, source, mut server) = running_client().await;
    assert_eq!(source.roster_sizes(), vec![1]);

    server.push_handshake(&[(1, "alice"), (2, "bob")]).await;
    client.tick().await.unwrap();
    assert_eq!(source.roster_sizes(), vec![1, 2]);
}

#[tokio::test]
async fn test_roster_shrink_invalidates_slots() {
    let (mut client, _source, mut server) = running_client().await;

    // Player 1 is replaced by player 2.
    server.push_handshake(&[(2, "bob")]).await;
    client.tick().await.unwrap();

    // Bob's slots are fresh: a full sweep for him, nothing for alice.
    client.tick().await.unwrap();
    let sweep = server.drain_inputs().await;
    assert_eq!(sweep.len(), GameControl::COUNT);
    assert!(sweep.iter().all(|input| input.player == PlayerId(2)));

    // Alice returns: her slots were invalidated, so she sweeps again.
    server.push_handshake(&[(1, "alice"), (2, "bob")]).await;
    client.tick().await.unwrap();
    client.tick().await.unwrap();
    let sweep = server.drain_inputs().await;
    assert_eq!(sweep.len(), GameControl::COUNT);
    assert!(sweep.iter().all(|input| input.player == PlayerId(1)));
}

#[tokio::test]
async fn test_run_exits_on_disconnect() {
    let (mut client, _source, server) = running_client().await;
    drop(server);

    client.run().await.unwrap();
    assert_eq!(client.session().state(), SessionState::Disconnected);
    // The stale roster stays visible until a future handshake.
    assert_eq!(client.session().roster().len(), 1);
}
