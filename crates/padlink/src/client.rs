//! The cooperative client loop: sample inputs, gate through the delta
//! tracker, stream changes, pump the session.

use padlink_input::{DeltaTracker, InputSource};
use padlink_protocol::{BincodeCodec, Codec, GameControl};
use padlink_session::{Session, SessionEvent};
use padlink_transport::Endpoint;
use tracing::debug;

use crate::PadlinkError;

/// A complete input client: one [`Session`], one [`InputSource`], and the
/// [`DeltaTracker`] between them.
///
/// One [`tick`](Client::tick) is one turn of the cooperative loop: sample
/// every known (player, control) pair, send what changed, then pump the
/// session once with its bounded wait. Nothing here spawns tasks; the
/// single caller task owns everything, so the roster is mutated only
/// inside the pump and read only from the sampling step.
pub struct Client<E: Endpoint, S: InputSource, C: Codec = BincodeCodec> {
    session: Session<E, C>,
    source: S,
    tracker: DeltaTracker,
    /// Input streaming is gated on a completed handshake, not on the
    /// transport connection.
    handshaken: bool,
}

impl<E: Endpoint, S: InputSource, C: Codec> Client<E, S, C> {
    /// Wraps a session and an input source into a client loop.
    pub fn new(session: Session<E, C>, source: S) -> Self {
        Self {
            session,
            source,
            tracker: DeltaTracker::new(),
            handshaken: false,
        }
    }

    /// Read access to the underlying session.
    pub fn session(&self) -> &Session<E, C> {
        &self.session
    }

    /// Starts connecting. See [`Session::connect`].
    pub async fn connect(
        &mut self,
        host: &str,
        port: u16,
    ) -> Result<(), PadlinkError> {
        self.session.connect(host, port).await?;
        Ok(())
    }

    /// Sends a login request. See [`Session::login`].
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        user_id: Option<u32>,
    ) -> Result<(), PadlinkError> {
        self.session.login(username, password, user_id).await?;
        Ok(())
    }

    /// Runs one turn of the loop and returns what the pump observed.
    ///
    /// Sampling happens first (when a handshake has completed), then one
    /// bounded-wait pump. On `HandshakeCompleted` the tracker drops slots
    /// of departed players and the source is told the new roster size; on
    /// `Disconnected` streaming stops until the next handshake.
    pub async fn tick(
        &mut self,
    ) -> Result<Option<SessionEvent>, PadlinkError> {
        if self.handshaken {
            self.sample().await?;
        }

        let event = self.session.poll().await?;
        match event {
            Some(SessionEvent::HandshakeCompleted) => {
                self.handshaken = true;
                self.tracker
                    .sync_players(self.session.roster().player_ids());
                self.source.roster_changed(self.session.roster().len());
            }
            Some(SessionEvent::Disconnected) => {
                self.handshaken = false;
            }
            _ => {}
        }
        Ok(event)
    }

    /// Loops [`tick`](Client::tick) until the session disconnects.
    ///
    /// Returns normally on disconnect — reconnecting (or giving up) is
    /// the caller's policy, applied around a fresh `connect`.
    pub async fn run(&mut self) -> Result<(), PadlinkError> {
        loop {
            if let Some(SessionEvent::Disconnected) = self.tick().await? {
                debug!("client loop finished — session disconnected");
                return Ok(());
            }
        }
    }

    /// Gracefully closes the session. See [`Session::disconnect`].
    pub async fn disconnect(&mut self) {
        self.session.disconnect().await;
        self.handshaken = false;
    }

    /// One exhaustive sampling pass over every (player, control) pair.
    ///
    /// Players ascend by id and controls by ordinal, so every slot is
    /// visited deterministically each tick and none can be starved. Only
    /// values the tracker reports as changed are sent.
    async fn sample(&mut self) -> Result<(), PadlinkError> {
        for player in self.session.roster().player_ids() {
            for control in GameControl::ALL {
                let value = self.source.control_state(player, control);
                if let Some(changed) =
                    self.tracker.observe(player, control, value)
                {
                    self.session
                        .send_input(player, control, changed)
                        .await?;
                }
            }
        }
        Ok(())
    }
}
