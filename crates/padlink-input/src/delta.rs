//! Per-(player, control) last-sent cache — the delta-encoding gate.
//!
//! Every sampled value passes through [`DeltaTracker::observe`]; only
//! values that differ from the last transmitted one come back out for
//! sending. This turns the O(players × controls) per-tick sampling cost
//! into a handful of actual packets under steady input, while guaranteeing
//! no transition is ever swallowed: a value is recorded as sent in the
//! same step that reports it.

use std::collections::HashMap;

use padlink_protocol::{GameControl, PlayerId};

/// One player's last-sent values, densely indexed by control ordinal.
///
/// `None` is the "unset" state and is distinct from every valid sample,
/// so the first observation for a slot always transmits — including a
/// first observation of zero.
type ControlSlots = [Option<i32>; GameControl::COUNT];

/// The last-transmitted-value table for all tracked players.
///
/// Player rows are created lazily on first observation and dropped via
/// [`sync_players`](DeltaTracker::sync_players) when a handshake removes
/// the player from the roster.
#[derive(Debug, Default)]
pub struct DeltaTracker {
    slots: HashMap<PlayerId, ControlSlots>,
}

impl DeltaTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one sampled value through the delta gate.
    ///
    /// Returns `Some(value)` — and records it as last-sent — when the
    /// slot was unset or held a different value; returns `None` when the
    /// sample matches what was already transmitted.
    pub fn observe(
        &mut self,
        player: PlayerId,
        control: GameControl,
        value: i32,
    ) -> Option<i32> {
        let row = self
            .slots
            .entry(player)
            .or_insert([None; GameControl::COUNT]);
        let slot = &mut row[control.ordinal() as usize];
        if *slot == Some(value) {
            return None;
        }
        *slot = Some(value);
        Some(value)
    }

    /// Drops rows for every player not in `players`.
    ///
    /// Called after each handshake: slots of players that vanished from
    /// the authoritative roster are invalidated, so a later re-appearance
    /// starts from "unset" and transmits its first sample again. Rows of
    /// surviving players are kept as-is — their last-sent values are
    /// still what the server knows.
    pub fn sync_players<I>(&mut self, players: I)
    where
        I: IntoIterator<Item = PlayerId>,
    {
        let keep: std::collections::HashSet<PlayerId> =
            players.into_iter().collect();
        let before = self.slots.len();
        self.slots.retain(|id, _| keep.contains(id));
        let dropped = before - self.slots.len();
        if dropped > 0 {
            tracing::debug!(dropped, "invalidated input slots for departed players");
        }
    }

    /// Forgets everything. Every next observation transmits.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of players with at least one observed slot.
    pub fn tracked_players(&self) -> usize {
        self.slots.len()
    }
}
