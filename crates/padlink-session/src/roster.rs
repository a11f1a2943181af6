//! The player roster: the client's copy of who is playing.
//!
//! The roster is owned by the [`Session`](crate::Session) and mutated only
//! from its dispatch step; everything else reads it through a shared
//! borrow. A handshake is authoritative — the whole table is rebuilt, not
//! merged — and nothing but a handshake ever changes it.

use std::collections::HashMap;

use padlink_protocol::{PlayerEntry, PlayerId};

/// One active player as known to this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Server-assigned id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Whether the server marked the slot active.
    pub active: bool,
}

impl From<PlayerEntry> for Player {
    fn from(entry: PlayerEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.username,
            active: entry.active,
        }
    }
}

/// The current set of players, keyed by id.
#[derive(Debug, Default)]
pub struct Roster {
    players: HashMap<PlayerId, Player>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire roster with `players`.
    ///
    /// Entries from the previous roster never survive, even for ids not
    /// present in the new list.
    pub fn replace_all<I>(&mut self, players: I)
    where
        I: IntoIterator<Item = Player>,
    {
        self.players.clear();
        for player in players {
            tracing::debug!(id = %player.id, name = %player.name, "roster player");
            self.players.insert(player.id, player);
        }
    }

    /// Removes every player.
    pub fn clear(&mut self) {
        self.players.clear();
    }

    /// Looks a player up by id.
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Iterates all players in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// All player ids, sorted ascending.
    ///
    /// Sorted so one sampling tick walks players in a stable order.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self.players.keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
