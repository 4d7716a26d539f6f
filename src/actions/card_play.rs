//! Actions run when a card is played.

use serde::{Deserialize, Serialize};

use super::combinators::{atomic, guard, sequence, transaction, WorldAction};
use super::condition::{Condition, ConditionContext, ConditionEvaluator};
use super::target::{TargetAction, TargetArg};
use crate::cards::{CardId, CardRegistry};
use crate::core::entity::{CharacterRef, EntityId};
use crate::core::player::PlayerId;
use crate::core::World;
use crate::damage::DamageSource;
use crate::error::{EngineError, Result};
use crate::undo::UndoAction;

/// The card being played, who plays it, and the chosen target (if any).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlayArg {
    pub card: EntityId,
    pub player: PlayerId,
    pub target: Option<CharacterRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardPlayAction {
    Sequence(Vec<CardPlayAction>),
    Atomic(Box<CardPlayAction>),
    /// Guard on the chosen target. Fails closed without one.
    GuardTarget {
        condition: Condition,
        action: Box<CardPlayAction>,
    },
    /// Guard on the playing player only.
    GuardPlayer {
        condition: Condition,
        action: Box<CardPlayAction>,
    },

    /// Summon a minion right of the played card's minion.
    SummonMinionRight(CardId),
    /// The played card's minion damages the target.
    DealMinionDamage(i32),
    /// Run a target action with the card as the source.
    OnTarget(TargetAction),
    GainArmor(i32),
    AddCardToHand(CardId),
    /// Add one uniformly chosen card to hand.
    RandomCardToHand(Vec<CardId>),
}

impl CardPlayAction {
    pub fn guard_target(condition: Condition, action: CardPlayAction) -> Self {
        Self::GuardTarget {
            condition,
            action: Box::new(action),
        }
    }

    pub fn guard_player(condition: Condition, action: CardPlayAction) -> Self {
        Self::GuardPlayer {
            condition,
            action: Box::new(action),
        }
    }

    pub fn validate(&self, registry: &CardRegistry) -> std::result::Result<(), String> {
        match self {
            Self::Sequence(actions) => actions.iter().try_for_each(|a| a.validate(registry)),
            Self::Atomic(action)
            | Self::GuardTarget { action, .. }
            | Self::GuardPlayer { action, .. } => action.validate(registry),
            Self::SummonMinionRight(card) => super::require_minion(registry, *card),
            Self::OnTarget(action) => action.validate(registry),
            Self::AddCardToHand(card) => super::require_card(registry, *card),
            Self::RandomCardToHand(candidates) => {
                if candidates.is_empty() {
                    return Err("random card has no candidates".to_string());
                }
                candidates.iter().try_for_each(|card| super::require_card(registry, *card))
            }
            _ => Ok(()),
        }
    }
}

impl WorldAction for CardPlayAction {
    type Arg = CardPlayArg;

    fn alter_world(&self, world: &mut World, arg: CardPlayArg) -> Result<UndoAction> {
        match self {
            Self::Sequence(actions) => sequence(world, actions, arg),
            Self::Atomic(action) => atomic(world, action.as_ref(), arg),
            Self::GuardTarget { condition, action } => {
                let holds = arg.target.is_some_and(|target| {
                    let ctx = ConditionContext::new(arg.player, Some(target));
                    ConditionEvaluator::evaluate(condition, world, &ctx)
                });
                guard(world, holds, action.as_ref(), arg)
            }
            Self::GuardPlayer { condition, action } => {
                let ctx = ConditionContext::new(arg.player, None);
                let holds = ConditionEvaluator::evaluate(condition, world, &ctx);
                guard(world, holds, action.as_ref(), arg)
            }

            Self::SummonMinionRight(card) => {
                let Some(minion) = world.require_card(arg.card)?.minion() else {
                    return Ok(UndoAction::noop());
                };
                let template = world.registry().minion_of(*card)?;
                Ok(world.summon_right_of(minion, template)?.into_undo())
            }
            Self::DealMinionDamage(amount) => {
                let Some(target) = arg.target else {
                    return Ok(UndoAction::noop());
                };
                let minion = world.require_card(arg.card)?.minion().ok_or_else(|| {
                    EngineError::invariant(format!("{} deals minion damage without a minion", arg.card))
                })?;
                Ok(world
                    .deal_damage(DamageSource::Minion(minion), *amount, target)?
                    .into_undo())
            }
            Self::OnTarget(action) => match arg.target {
                Some(target) => action.alter_world(
                    world,
                    TargetArg {
                        source: DamageSource::Card(arg.card),
                        target,
                    },
                ),
                None => Ok(UndoAction::noop()),
            },
            Self::GainArmor(amount) => world.gain_armor(arg.player, *amount),
            Self::AddCardToHand(card) => add_to_hand(world, arg.player, *card),
            Self::RandomCardToHand(candidates) => match world.rng().pick_index(candidates.len()) {
                Some(index) => add_to_hand(world, arg.player, candidates[index]),
                None => Ok(UndoAction::noop()),
            },
        }
    }
}

/// A new card for `player`; nothing happens with a full hand.
pub(super) fn add_to_hand(world: &mut World, player: PlayerId, card: CardId) -> Result<UndoAction> {
    if world.player(player).hand.len() >= world.config().max_hand_size {
        return Ok(UndoAction::noop());
    }
    transaction(world, |world, undo| {
        let card = undo.add_result(world.create_card(player, card)?);
        undo.add(world.add_card_to_hand(card)?);
        Ok(())
    })
}
