//! Minions, heroes and the per-player zones (board, hand, deck).
//!
//! Zone operations are `World` methods in [`zones`]; every one of them
//! returns an undo restoring the zone it touched.

mod minion;
mod player;
pub mod zones;

pub use minion::{Minion, MinionFlag};
pub use player::{Hero, PlayerState};
