//! Damage creation and resolution.
//!
//! Damage is built in two steps. [`World::create_damage`] turns a raw amount
//! into a [`Damage`] value by folding it through the source's modifiers
//! (a minion's outgoing damage, a player's spell damage). Then
//! [`World::damage_character`] applies it to a hero or a minion.

mod resolve;

use serde::{Deserialize, Serialize};

use crate::core::entity::EntityId;
use crate::core::player::PlayerId;

/// Who deals a piece of damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    Minion(EntityId),
    /// A card being played; minion cards deal damage as their minion.
    Card(EntityId),
    Hero(PlayerId),
}

/// A resolved damage amount. Negative amounts heal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    pub source: DamageSource,
    pub amount: i32,
}

impl Damage {
    #[must_use]
    pub const fn new(source: DamageSource, amount: i32) -> Self {
        Self { source, amount }
    }

    #[must_use]
    pub const fn is_heal(&self) -> bool {
        self.amount < 0
    }
}
