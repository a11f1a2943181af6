//! The session: one logical connection to one controller-distribution
//! server.
//!
//! The session owns the transport endpoint and the roster, tracks the
//! connection/login lifecycle, and turns raw transport events into
//! [`SessionEvent`]s through a tag-dispatched receive step. It is driven
//! by a single cooperative loop: nothing here spawns tasks, and the only
//! suspension points are the bounded waits inside [`poll`](Session::poll)
//! and [`disconnect`](Session::disconnect).

use std::fmt;

use padlink_protocol::{
    BincodeCodec, Codec, GameControl, Handshake, InputState, LoginOutcome,
    LoginRequest, LoginResponse, PlayerId, Tag, decode_frame, encode_frame,
};
use padlink_transport::{Delivery, Endpoint, PeerId, TransportEvent};
use tracing::{debug, info, trace, warn};

use crate::{Player, Roster, SessionConfig, SessionError, SessionEvent};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Lifecycle state of a [`Session`].
///
/// ```text
/// Idle ──connect()──→ Connecting ──peer confirmed──→ Connected
///                                                        │ HANDS
///                                                        ▼
///              LoginPending ←──login()── HandshakeReceived
///                   │ LOGRE
///                   ▼
///        LoggedIn / LoginFailed ··· any state ──peer lost──→ Disconnected
///                                                 (connect() again)
/// ```
///
/// A connected transport is necessary but not sufficient for input
/// streaming: the session only becomes useful once a handshake arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Fresh session; never connected.
    Idle,
    /// Connection attempt started, not yet confirmed by the transport.
    Connecting,
    /// Transport confirmed; waiting for the server's handshake push.
    Connected,
    /// A handshake has been received; input streaming may begin.
    HandshakeReceived,
    /// A login request is in flight.
    LoginPending,
    /// The server accepted the login.
    LoggedIn,
    /// The server rejected the login with the recorded outcome.
    LoginFailed(LoginOutcome),
    /// The peer is gone; `connect` may be called again.
    Disconnected,
}

impl SessionState {
    /// Whether the transport connection has been confirmed and not yet
    /// lost — the gate for `login`.
    pub fn is_connected(self) -> bool {
        matches!(
            self,
            SessionState::Connected
                | SessionState::HandshakeReceived
                | SessionState::LoginPending
                | SessionState::LoggedIn
                | SessionState::LoginFailed(_)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::Connecting => f.write_str("connecting"),
            SessionState::Connected => f.write_str("connected"),
            SessionState::HandshakeReceived => {
                f.write_str("handshake received")
            }
            SessionState::LoginPending => f.write_str("login pending"),
            SessionState::LoggedIn => f.write_str("logged in"),
            SessionState::LoginFailed(outcome) => {
                write!(f, "login failed ({outcome})")
            }
            SessionState::Disconnected => f.write_str("disconnected"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One logical connection to one server. One per process in this design.
pub struct Session<E: Endpoint, C: Codec = BincodeCodec> {
    endpoint: E,
    codec: C,
    config: SessionConfig,
    state: SessionState,
    /// The transport-level handle for the server, present from the start
    /// of a connect attempt until disconnect/reset clears it. Input sent
    /// while this is `None` is silently dropped.
    server_peer: Option<PeerId>,
    /// Name the server advertised in its last handshake.
    server_name: Option<String>,
    roster: Roster,
}

impl<E: Endpoint> Session<E> {
    /// Creates a session over `endpoint` with the default binary codec.
    pub fn new(endpoint: E, config: SessionConfig) -> Self {
        Self::with_codec(endpoint, BincodeCodec, config)
    }
}

impl<E: Endpoint, C: Codec> Session<E, C> {
    /// Creates a session with an explicit payload codec.
    ///
    /// Both ends must speak the same codec; see
    /// [`Codec`](padlink_protocol::Codec).
    pub fn with_codec(endpoint: E, codec: C, config: SessionConfig) -> Self {
        Self {
            endpoint,
            codec,
            config: config.validated(),
            state: SessionState::Idle,
            server_peer: None,
            server_name: None,
            roster: Roster::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The roster from the most recent handshake.
    ///
    /// Deliberately retained across a disconnect: the roster is replaced
    /// only by the next handshake, so a disconnected session reports its
    /// last-known players until reconnection completes. Callers that must
    /// not act on stale data should gate on [`state`](Session::state).
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Name the server advertised for itself, once a handshake arrived.
    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// Read access to the transport endpoint (diagnostics).
    pub fn transport(&self) -> &E {
        &self.endpoint
    }

    /// Starts connecting to `host:port`.
    ///
    /// Moves the session to `Connecting`; the confirmation arrives as
    /// [`SessionEvent::Connected`] from [`poll`](Session::poll).
    ///
    /// # Errors
    /// [`SessionError::AlreadyActive`] unless the session is `Idle` or
    /// `Disconnected`; [`SessionError::NoRoute`] when the transport cannot
    /// allocate an outbound peer slot — fatal for this attempt, the outer
    /// loop owns any retry.
    pub async fn connect(
        &mut self,
        host: &str,
        port: u16,
    ) -> Result<(), SessionError> {
        if !matches!(
            self.state,
            SessionState::Idle | SessionState::Disconnected
        ) {
            return Err(SessionError::AlreadyActive(self.state));
        }

        info!(host, port, "connecting");
        match self.endpoint.connect(host, port).await {
            Ok(peer) => {
                self.server_peer = Some(peer);
                self.state = SessionState::Connecting;
                Ok(())
            }
            Err(source) => {
                self.state = SessionState::Disconnected;
                Err(SessionError::NoRoute {
                    host: host.to_string(),
                    port,
                    source,
                })
            }
        }
    }

    /// Pumps one transport event with the configured bounded wait.
    ///
    /// Callable every tick without stalling the caller. Returns `None`
    /// when nothing happened; a `Some` event always reflects a state or
    /// roster change. Per-packet failures are logged and discarded here —
    /// they never terminate the session.
    ///
    /// # Errors
    /// Only structural transport failures propagate.
    pub async fn poll(
        &mut self,
    ) -> Result<Option<SessionEvent>, SessionError> {
        match self.endpoint.service(self.config.poll_wait).await? {
            None => Ok(None),
            Some(TransportEvent::Connected(peer)) => {
                self.server_peer = Some(peer);
                self.state = SessionState::Connected;
                info!(%peer, "connected to server");
                Ok(Some(SessionEvent::Connected))
            }
            Some(TransportEvent::Disconnected(peer)) => {
                self.server_peer = None;
                self.state = SessionState::Disconnected;
                info!(%peer, "disconnected from server");
                Ok(Some(SessionEvent::Disconnected))
            }
            Some(TransportEvent::Received { peer, data }) => {
                Ok(self.dispatch(peer, &data))
            }
        }
    }

    /// Sends a login request, reliably tagged `LOGRQ`.
    ///
    /// An empty `password` and an absent `user_id` are genuinely omitted
    /// from the wire payload. No response is awaited here; the result
    /// arrives as [`SessionEvent::LoginResult`] from
    /// [`poll`](Session::poll).
    ///
    /// # Errors
    /// [`SessionError::NotConnected`] before the transport connection is
    /// confirmed; transport failures propagate.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        user_id: Option<u32>,
    ) -> Result<(), SessionError> {
        if !self.state.is_connected() {
            return Err(SessionError::NotConnected(self.state));
        }
        let peer = self
            .server_peer
            .ok_or(SessionError::NotConnected(self.state))?;

        let request = LoginRequest {
            username: username.to_string(),
            password: (!password.is_empty()).then(|| password.to_string()),
            user_id,
        };
        let payload = self.codec.encode(&request)?;
        let packet = encode_frame(Tag::LOGIN_REQUEST, &payload);
        self.endpoint
            .send(peer, &packet, Delivery::Reliable)
            .await?;

        self.state = SessionState::LoginPending;
        info!(username, "login request sent");
        Ok(())
    }

    /// Sends one control's new value, reliably tagged `INPUT`.
    ///
    /// A no-op (not an error) while no server peer is held — the caller's
    /// loop gates on handshake completion, so input sent across a brief
    /// disconnect is dropped silently. Reliable delivery because losing a
    /// transition is unacceptable; redundant re-delivery is fine since the
    /// receiver is idempotent per value.
    pub async fn send_input(
        &mut self,
        player: PlayerId,
        control: GameControl,
        value: i32,
    ) -> Result<(), SessionError> {
        let Some(peer) = self.server_peer else {
            trace!(%player, ?control, "no server peer — input dropped");
            return Ok(());
        };

        let message = InputState {
            player,
            control,
            value,
        };
        let payload = self.codec.encode(&message)?;
        let packet = encode_frame(Tag::INPUT, &payload);
        self.endpoint
            .send(peer, &packet, Delivery::Reliable)
            .await?;
        trace!(%player, ?control, value, "input sent");
        Ok(())
    }

    /// Gracefully closes the connection.
    ///
    /// Requests a close and drains transport events for up to
    /// `disconnect_wait`, discarding data that arrives during teardown.
    /// If the peer's acknowledgment does not arrive in time, the peer is
    /// forcibly reset — exactly once. Idempotent: with no peer held this
    /// does nothing, so it is safe on every teardown path.
    pub async fn disconnect(&mut self) {
        let Some(peer) = self.server_peer else {
            return;
        };

        let mut acknowledged = false;
        match self.endpoint.disconnect(peer).await {
            Ok(()) => {
                let deadline = tokio::time::Instant::now()
                    + self.config.disconnect_wait;
                loop {
                    let remaining = deadline
                        .saturating_duration_since(tokio::time::Instant::now());
                    if remaining.is_zero() {
                        break;
                    }
                    match self.endpoint.service(remaining).await {
                        Ok(Some(TransportEvent::Disconnected(_))) => {
                            acknowledged = true;
                            break;
                        }
                        // Late data is dropped; the session is going away.
                        Ok(Some(_)) => continue,
                        Ok(None) => break,
                        Err(error) => {
                            warn!(%error, "teardown drain failed");
                            break;
                        }
                    }
                }
            }
            Err(error) => {
                warn!(%error, "graceful close failed — resetting");
            }
        }

        if acknowledged {
            info!(%peer, "disconnected gracefully");
        } else {
            warn!(%peer, "no disconnect acknowledgment — forcing reset");
            self.endpoint.reset(peer);
        }
        self.server_peer = None;
        self.state = SessionState::Disconnected;
    }

    // -----------------------------------------------------------------
    // Receive dispatch
    // -----------------------------------------------------------------

    /// Decodes and applies one incoming packet.
    ///
    /// Network-controlled bytes end here: anything that fails to parse is
    /// logged and discarded without touching session state.
    fn dispatch(&mut self, peer: PeerId, buffer: &[u8]) -> Option<SessionEvent> {
        let (tag, payload) = match decode_frame(buffer) {
            Ok(parts) => parts,
            Err(error) => {
                warn!(%peer, %error, "discarding packet");
                return None;
            }
        };

        match tag {
            Tag::HANDSHAKE => self.on_handshake(tag, payload),
            Tag::LOGIN_RESPONSE => self.on_login_response(tag, payload),
            other => {
                debug!(%peer, tag = %other, "unrecognized tag — discarded");
                None
            }
        }
    }

    fn on_handshake(&mut self, tag: Tag, payload: &[u8]) -> Option<SessionEvent> {
        let handshake: Handshake = match self.codec.decode(tag, payload) {
            Ok(message) => message,
            Err(error) => {
                warn!(%error, "discarding packet");
                return None;
            }
        };

        // The handshake is the complete authoritative player set; the
        // previous roster is rebuilt, never merged into.
        self.roster
            .replace_all(handshake.players.into_iter().map(Player::from));
        self.server_name = Some(handshake.name);
        self.state = SessionState::HandshakeReceived;
        info!(
            server = self.server_name.as_deref().unwrap_or_default(),
            players = self.roster.len(),
            "handshake completed"
        );
        Some(SessionEvent::HandshakeCompleted)
    }

    fn on_login_response(
        &mut self,
        tag: Tag,
        payload: &[u8],
    ) -> Option<SessionEvent> {
        let response: LoginResponse = match self.codec.decode(tag, payload) {
            Ok(message) => message,
            Err(error) => {
                warn!(%error, "discarding packet");
                return None;
            }
        };

        if self.state != SessionState::LoginPending {
            // Tolerated: a retransmitted or unsolicited response still
            // carries the server's verdict.
            warn!(state = %self.state, "login response outside a pending login");
        }
        let outcome = LoginOutcome::from_code(response.code);
        self.state = if outcome.is_success() {
            SessionState::LoggedIn
        } else {
            SessionState::LoginFailed(outcome)
        };
        info!(code = response.code, %outcome, "login result");
        Some(SessionEvent::LoginResult(outcome))
    }
}

/// Backstop for teardown paths that skip [`Session::disconnect`]: a peer
/// still held at drop time is forcibly reset, so the transport handle is
/// released exactly once on every exit path.
impl<E: Endpoint, C: Codec> Drop for Session<E, C> {
    fn drop(&mut self) {
        if let Some(peer) = self.server_peer.take() {
            warn!(%peer, "session dropped with live peer — resetting");
            self.endpoint.reset(peer);
        }
    }
}
