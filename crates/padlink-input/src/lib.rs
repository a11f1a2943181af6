//! Input sampling support for Padlink.
//!
//! Two pieces live here, both on the client side of the wire:
//!
//! 1. **Capability boundary** — the [`InputSource`] trait, through which
//!    external input providers expose "current value of (player, control)"
//!    and nothing else.
//! 2. **Delta gate** — the [`DeltaTracker`], the per-(player, control)
//!    last-sent cache that decides which samples are worth a packet.
//!
//! # How it fits in the stack
//!
//! ```text
//! Run loop (above)   ← samples sources, gates through the tracker
//!     ↕
//! Input layer (this crate)
//!     ↕
//! Protocol layer (below)  ← provides PlayerId, GameControl
//! ```

mod delta;
mod source;

pub use delta::DeltaTracker;
pub use source::InputSource;
