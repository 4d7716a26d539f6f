//! Per-player state.

use im::Vector;

use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::values::DynamicValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hero {
    pub health: i32,
    pub max_health: i32,
    pub armor: i32,
}

impl Hero {
    #[must_use]
    pub fn new(health: i32) -> Self {
        Self {
            health,
            max_health: health,
            armor: 0,
        }
    }

    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }
}

/// Everything one player owns besides the card and minion entities.
///
/// Zones store entity ids. The top of the deck is the back of `deck`.
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub id: PlayerId,
    pub hero: Hero,
    pub hand: Vector<EntityId>,
    pub deck: Vector<EntityId>,
    pub board: Vector<EntityId>,
    pub mana: i32,
    /// Bonus added to spell damage.
    pub spell_damage: DynamicValue<i32>,
    pub cards_played_this_turn: u32,
}

impl PlayerState {
    #[must_use]
    pub fn new(id: PlayerId, hero_health: i32, mana: i32) -> Self {
        Self {
            id,
            hero: Hero::new(hero_health),
            hand: Vector::new(),
            deck: Vector::new(),
            board: Vector::new(),
            mana,
            spell_damage: DynamicValue::new(0),
            cards_played_this_turn: 0,
        }
    }

    /// Spell damage for a raw amount. Healing (negative) is not boosted.
    #[must_use]
    pub fn spell_damage(&self, raw: i32) -> i32 {
        if raw <= 0 {
            raw
        } else {
            self.spell_damage.derive_from(raw)
        }
    }
}
