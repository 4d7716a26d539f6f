//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::core::entity::{CharacterRef, EntityId};
use crate::core::player::PlayerId;
use crate::damage::DamageSource;

/// Event kind, used to index listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    CardPlayed,
    ArmorGained,
    DamageDealt,
    MinionSummoned,
    MinionDied,
}

/// Something that happened in the world, with the data listeners need.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainEvent {
    CardPlayed {
        card: EntityId,
        owner: PlayerId,
        mana_cost_paid: i32,
    },
    ArmorGained {
        hero: PlayerId,
        amount: i32,
    },
    DamageDealt {
        source: DamageSource,
        target: CharacterRef,
        amount: i32,
    },
    MinionSummoned {
        minion: EntityId,
        owner: PlayerId,
    },
    MinionDied {
        minion: EntityId,
        owner: PlayerId,
        /// Board slot the minion held, if it died on the board.
        position: Option<usize>,
    },
}

impl DomainEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CardPlayed { .. } => EventKind::CardPlayed,
            Self::ArmorGained { .. } => EventKind::ArmorGained,
            Self::DamageDealt { .. } => EventKind::DamageDealt,
            Self::MinionSummoned { .. } => EventKind::MinionSummoned,
            Self::MinionDied { .. } => EventKind::MinionDied,
        }
    }

    /// The player the event belongs to. Damage events have none.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        match *self {
            Self::CardPlayed { owner, .. }
            | Self::MinionSummoned { owner, .. }
            | Self::MinionDied { owner, .. } => Some(owner),
            Self::ArmorGained { hero, .. } => Some(hero),
            Self::DamageDealt { .. } => None,
        }
    }
}

impl std::fmt::Display for DomainEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CardPlayed { card, owner, mana_cost_paid } => {
                write!(f, "{owner} played {card} for {mana_cost_paid}")
            }
            Self::ArmorGained { hero, amount } => write!(f, "{hero} gained {amount} armor"),
            Self::DamageDealt { source, target, amount } => {
                write!(f, "{source:?} dealt {amount} to {target}")
            }
            Self::MinionSummoned { minion, owner } => write!(f, "{owner} summoned {minion}"),
            Self::MinionDied { minion, owner, .. } => write!(f, "{minion} of {owner} died"),
        }
    }
}
