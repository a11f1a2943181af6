//! Discrete events surfaced by the session's poll pump.

use padlink_protocol::LoginOutcome;

/// What one [`poll`](crate::Session::poll) pump observed.
///
/// Notification is by returned value, not callback: the caller matches on
/// the event each tick. `poll` returns `None` when nothing happened —
/// every `Some` means session state changed and the caller may want to
/// react (re-render, start a login, begin sampling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The transport confirmed the connection. The session is not yet
    /// usable for input — that takes a completed handshake.
    Connected,

    /// A handshake arrived and the roster was replaced wholesale.
    HandshakeCompleted,

    /// The server answered a login request.
    LoginResult(LoginOutcome),

    /// The peer is gone. The roster intentionally retains its last
    /// contents until the next handshake.
    Disconnected,
}
