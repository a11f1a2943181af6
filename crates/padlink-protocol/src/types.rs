//! Typed wire messages for the Padlink protocol.
//!
//! These are the structures that travel behind each packet tag. They are
//! plain serde types; how they become bytes is the [`Codec`](crate::Codec)'s
//! business, and which tag fronts them is the session's.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A server-assigned player identifier, unique within a session.
///
/// Newtype over `u32` so a player id can't be confused with a control
/// ordinal or an input value. `#[serde(transparent)]` keeps the wire
/// representation a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GameControl — the closed set of logical inputs
// ---------------------------------------------------------------------------

/// The fixed, closed set of logical input controls.
///
/// The set is exhaustive and ordinal: [`GameControl::ALL`] iterates every
/// control in declaration order, and [`ordinal`](GameControl::ordinal) /
/// [`from_ordinal`](GameControl::from_ordinal) convert to and from the
/// wire representation. Per-player state tables are sized by
/// [`GameControl::COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameControl {
    Up,
    Down,
    Left,
    Right,
    Action,
    Button1,
    Button2,
    Button3,
    Button4,
    Button5,
    Button6,
}

impl GameControl {
    /// Total number of controls.
    pub const COUNT: usize = 11;

    /// Every control, in ordinal order.
    pub const ALL: [GameControl; Self::COUNT] = [
        GameControl::Up,
        GameControl::Down,
        GameControl::Left,
        GameControl::Right,
        GameControl::Action,
        GameControl::Button1,
        GameControl::Button2,
        GameControl::Button3,
        GameControl::Button4,
        GameControl::Button5,
        GameControl::Button6,
    ];

    /// The control's position in the ordinal order.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Looks a control up by ordinal. `None` if out of range.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
}

// ---------------------------------------------------------------------------
// Wire messages
// ---------------------------------------------------------------------------

/// One player record inside a handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Server-assigned id.
    pub id: PlayerId,
    /// Display name.
    pub username: String,
    /// Whether the server considers this player slot active.
    pub active: bool,
}

/// Server → client (`HANDS`): the authoritative roster for this session.
///
/// A handshake always describes the complete set of active players; the
/// receiver replaces its roster wholesale rather than merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handshake {
    /// Name the server installation advertises for itself.
    pub name: String,
    /// The full player list.
    pub players: Vec<PlayerEntry>,
}

/// Client → server (`LOGRQ`): a login request.
///
/// Optional fields are genuinely absent from the wire when unset — `None`
/// is encoded as absence, never as an empty string or a zero id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Option<String>,
    pub user_id: Option<u32>,
}

/// Server → client (`LOGRE`): the numeric login response code.
///
/// The code space is open-ended on the wire; [`LoginOutcome::from_code`]
/// maps it totally on the client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub code: u32,
}

/// Client → server (`INPUT`): one control's freshly changed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub player: PlayerId,
    pub control: GameControl,
    pub value: i32,
}

// ---------------------------------------------------------------------------
// LoginOutcome — client-side reading of the response code
// ---------------------------------------------------------------------------

/// The client-side outcome of a login attempt.
///
/// Every wire code maps to exactly one variant; codes the client does not
/// know map to [`Unknown`](LoginOutcome::Unknown) rather than failing, so
/// a newer server can never wedge the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Successful,
    WrongCredentials,
    NoLoginPossible,
    NoMoreTries,
    UserIdNotExisting,
    UserIdAlreadyActive,
    Unknown,
}

impl LoginOutcome {
    /// Maps a wire response code to its outcome. Total: unassigned codes
    /// become [`Unknown`](LoginOutcome::Unknown).
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => LoginOutcome::Successful,
            1 => LoginOutcome::WrongCredentials,
            2 => LoginOutcome::NoLoginPossible,
            3 => LoginOutcome::NoMoreTries,
            4 => LoginOutcome::UserIdNotExisting,
            5 => LoginOutcome::UserIdAlreadyActive,
            _ => LoginOutcome::Unknown,
        }
    }

    /// Whether the outcome is a successful login.
    pub fn is_success(self) -> bool {
        matches!(self, LoginOutcome::Successful)
    }
}

impl fmt::Display for LoginOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LoginOutcome::Successful => "login successful",
            LoginOutcome::WrongCredentials => "wrong credentials",
            LoginOutcome::NoLoginPossible => "no login possible",
            LoginOutcome::NoMoreTries => "no more tries",
            LoginOutcome::UserIdNotExisting => "user id not existing",
            LoginOutcome::UserIdAlreadyActive => "user id already active",
            LoginOutcome::Unknown => "unknown response code",
        };
        f.write_str(text)
    }
}

// =========================================================================
// Tests
// =========================================================================
