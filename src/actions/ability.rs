//! Triggered abilities and deathrattles.
//!
//! Both attach to a minion as event listeners. Attaching returns the
//! registration undo, so undoing the action that granted an ability also
//! detaches it.

use serde::{Deserialize, Serialize};

use super::card_play::add_to_hand;
use super::combinators::{sequence, transaction, WorldAction};
use super::minion::MinionAction;
use crate::cards::{CardId, CardRegistry};
use crate::core::entity::{CharacterRef, EntityId};
use crate::core::player::PlayerId;
use crate::core::World;
use crate::damage::DamageSource;
use crate::error::Result;
use crate::events::{DomainEvent, EventKind, ListenerId};
use crate::undo::{UndoAction, Undoable};
use crate::values::ModifierScope;

/// What wakes an ability up, seen from the minion holding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityTrigger {
    /// The holder's owner plays a card.
    FriendlyCardPlayed,
    /// Another minion joins the holder's side of the board.
    FriendlyMinionSummoned,
    /// The holder takes damage.
    DamageTaken,
    /// Any other minion dies.
    AnyMinionDied,
}

impl AbilityTrigger {
    #[must_use]
    pub fn event_kind(self) -> EventKind {
        match self {
            Self::FriendlyCardPlayed => EventKind::CardPlayed,
            Self::FriendlyMinionSummoned => EventKind::MinionSummoned,
            Self::DamageTaken => EventKind::DamageDealt,
            Self::AnyMinionDied => EventKind::MinionDied,
        }
    }

    fn fires(self, holder: EntityId, holder_owner: PlayerId, event: &DomainEvent) -> bool {
        match (self, event) {
            (Self::FriendlyCardPlayed, DomainEvent::CardPlayed { owner, .. }) => *owner == holder_owner,
            (Self::FriendlyMinionSummoned, DomainEvent::MinionSummoned { minion, owner }) => {
                *minion != holder && *owner == holder_owner
            }
            (Self::DamageTaken, DomainEvent::DamageDealt { target, .. }) => {
                *target == CharacterRef::Minion(holder)
            }
            (Self::AnyMinionDied, DomainEvent::MinionDied { minion, .. }) => *minion != holder,
            _ => false,
        }
    }
}

/// A triggered ability: when `trigger` fires, `action` runs on the holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub trigger: AbilityTrigger,
    pub action: Box<MinionAction>,
}

impl Ability {
    pub fn new(trigger: AbilityTrigger, action: MinionAction) -> Self {
        Self {
            trigger,
            action: Box::new(action),
        }
    }
}

/// The minion that died, its owner, and where it stood.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathrattleArg {
    pub minion: EntityId,
    pub owner: PlayerId,
    pub position: Option<usize>,
}

/// Runs when the minion it is attached to dies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathrattleAction {
    Sequence(Vec<DeathrattleAction>),
    /// Summon a minion into the slot the dead minion held.
    Summon(CardId),
    /// Summon a fresh copy of the dead minion into its slot.
    Resummon,
    DamageOpponentHero(i32),
    AddCardToHand(CardId),
    /// Run a minion action on every friendly minion left on the board.
    ForEachFriendly(Box<MinionAction>),
}

impl DeathrattleAction {
    pub fn for_each_friendly(action: MinionAction) -> Self {
        Self::ForEachFriendly(Box::new(action))
    }

    pub fn validate(&self, registry: &CardRegistry) -> std::result::Result<(), String> {
        match self {
            Self::Sequence(actions) => actions.iter().try_for_each(|a| a.validate(registry)),
            Self::Summon(card) => super::require_minion(registry, *card),
            Self::AddCardToHand(card) => super::require_card(registry, *card),
            Self::ForEachFriendly(action) => action.validate(registry),
            Self::Resummon | Self::DamageOpponentHero(_) => Ok(()),
        }
    }
}

impl WorldAction for DeathrattleAction {
    type Arg = DeathrattleArg;

    fn alter_world(&self, world: &mut World, arg: DeathrattleArg) -> Result<UndoAction> {
        let slot = arg
            .position
            .unwrap_or_else(|| world.player(arg.owner).board.len());

        match self {
            Self::Sequence(actions) => sequence(world, actions, arg),
            Self::Summon(card) => {
                let template = world.registry().minion_of(*card)?;
                Ok(world.summon(arg.owner, template, slot)?.into_undo())
            }
            Self::Resummon => {
                let Some(template) = world.minion(arg.minion).map(|m| m.template().clone()) else {
                    return Ok(UndoAction::noop());
                };
                Ok(world.summon(arg.owner, template, slot)?.into_undo())
            }
            Self::DamageOpponentHero(amount) => {
                let opponent = world.opponent_of(arg.owner);
                Ok(world
                    .deal_damage(DamageSource::Minion(arg.minion), *amount, CharacterRef::Hero(opponent))?
                    .into_undo())
            }
            Self::AddCardToHand(card) => add_to_hand(world, arg.owner, *card),
            Self::ForEachFriendly(action) => {
                let friendly: Vec<EntityId> = world.player(arg.owner).board.iter().copied().collect();
                transaction(world, |world, undo| {
                    for minion in friendly {
                        undo.add(action.alter_world(world, minion)?);
                    }
                    Ok(())
                })
            }
        }
    }
}

impl World {
    /// Give `minion` a triggered ability.
    ///
    /// A session scope drops the ability when session modifiers expire;
    /// any other scope keeps it until the undo runs. The result is `None`
    /// for a missing or dead minion.
    pub fn attach_ability(
        &mut self,
        minion: EntityId,
        ability: Ability,
        scope: ModifierScope,
    ) -> Undoable<Option<ListenerId>> {
        let Some(owner) = self.minion(minion).filter(|m| !m.is_dead()).map(|m| m.owner()) else {
            return Undoable::unchanged(None);
        };
        let kind = ability.trigger.event_kind();
        let listener = move |world: &mut World, event: &DomainEvent| {
            if !ability.trigger.fires(minion, owner, event) {
                return Ok(UndoAction::noop());
            }
            ability.action.alter_world(world, minion)
        };

        let (id, undo) = match scope {
            ModifierScope::Session => self.register_session_listener(kind, listener),
            ModifierScope::Permanent | ModifierScope::Removable => self.register_listener(kind, listener),
        }
        .into_parts();
        self.log.verbose("ability", format!("{minion} gains {id} ({scope:?})"));
        Undoable::new(Some(id), undo)
    }

    /// Run `action` when `minion` dies.
    pub fn add_deathrattle(
        &mut self,
        minion: EntityId,
        action: DeathrattleAction,
    ) -> Undoable<Option<ListenerId>> {
        if !self.is_minion_alive(minion) {
            return Undoable::unchanged(None);
        }
        let (id, undo) = self
            .register_listener(EventKind::MinionDied, move |world, event| match *event {
                DomainEvent::MinionDied { minion: died, owner, position } if died == minion => {
                    action.alter_world(world, DeathrattleArg { minion, owner, position })
                }
                _ => Ok(UndoAction::noop()),
            })
            .into_parts();
        self.log.verbose("ability", format!("{minion} gains deathrattle {id}"));
        Undoable::new(Some(id), undo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_filters_on_holder() {
        let holder = EntityId(1);
        let other = EntityId(2);
        let me = PlayerId(0);

        let summoned = |minion, owner| DomainEvent::MinionSummoned { minion, owner };
        assert!(AbilityTrigger::FriendlyMinionSummoned.fires(holder, me, &summoned(other, me)));
        assert!(!AbilityTrigger::FriendlyMinionSummoned.fires(holder, me, &summoned(holder, me)));
        assert!(!AbilityTrigger::FriendlyMinionSummoned.fires(holder, me, &summoned(other, PlayerId(1))));

        let died = DomainEvent::MinionDied {
            minion: holder,
            owner: me,
            position: Some(0),
        };
        assert!(!AbilityTrigger::AnyMinionDied.fires(holder, me, &died));
        assert!(!AbilityTrigger::DamageTaken.fires(holder, me, &died));
    }

    #[test]
    fn test_validate_checks_summoned_card() {
        let registry = CardRegistry::new();
        assert!(DeathrattleAction::Summon(CardId::new(9)).validate(&registry).is_err());
        assert!(DeathrattleAction::Resummon.validate(&registry).is_ok());
    }
}
