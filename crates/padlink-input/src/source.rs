//! The input-provider capability boundary.
//!
//! Padlink doesn't read hardware itself — concrete input providers
//! (loaded plugins, emulated pads, test scripts) live outside this core.
//! The [`InputSource`] trait is the one seam they plug into: the run loop
//! polls it once per (player, control) pair per tick and never learns how
//! the values are produced.

use padlink_protocol::{GameControl, PlayerId};

/// Produces the current value of one control for one player.
///
/// Implementations are free to be stateful (device handles, key maps);
/// the run loop holds the source exclusively, so `&mut self` suffices.
pub trait InputSource: Send + 'static {
    /// The current raw value for `(player, control)`.
    ///
    /// Polled exhaustively every sampling tick; must be cheap and must
    /// not block.
    fn control_state(
        &mut self,
        player: PlayerId,
        control: GameControl,
    ) -> i32;

    /// Called after every completed handshake with the new roster size,
    /// before the next sampling pass.
    ///
    /// Providers that size internal tables per player re-initialize here.
    /// The default does nothing.
    fn roster_changed(&mut self, player_count: usize) {
        let _ = player_count;
    }
}
