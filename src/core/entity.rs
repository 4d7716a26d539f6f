//! Entity identification.
//!
//! Cards and minions live in arenas owned by the [`World`](super::World)
//! and reference each other by `EntityId`, never by pointer. Ids are
//! allocated by the world in increasing order and never reused within one
//! world, so a stale id simply fails to resolve.
//!
//! Characters (anything that can be damaged) are addressed through
//! [`CharacterRef`]: either a player's hero or a minion.
//!
//! ```
//! use brazier_core::core::{CharacterRef, EntityId, PlayerId};
//!
//! let hero = CharacterRef::Hero(PlayerId::new(1));
//! let minion = CharacterRef::Minion(EntityId(7));
//!
//! assert!(hero.is_hero());
//! assert_eq!(minion.as_minion(), Some(EntityId(7)));
//! ```

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Unique identifier for a card or minion instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// A damageable character: a hero or a minion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterRef {
    Hero(PlayerId),
    Minion(EntityId),
}

impl CharacterRef {
    #[must_use]
    pub const fn is_hero(self) -> bool {
        matches!(self, Self::Hero(_))
    }

    #[must_use]
    pub const fn is_minion(self) -> bool {
        matches!(self, Self::Minion(_))
    }

    #[must_use]
    pub const fn as_minion(self) -> Option<EntityId> {
        match self {
            Self::Minion(id) => Some(id),
            Self::Hero(_) => None,
        }
    }
}

impl std::fmt::Display for CharacterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hero(player) => write!(f, "Hero of {player}"),
            Self::Minion(id) => write!(f, "Minion({})", id.0),
        }
    }
}
