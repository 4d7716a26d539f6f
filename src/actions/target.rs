//! Actions from a damage source onto a chosen character.

use serde::{Deserialize, Serialize};

use super::combinators::{atomic, guard, sequence, WorldAction};
use super::condition::{Condition, ConditionContext, ConditionEvaluator};
use super::minion::MinionAction;
use crate::cards::CardRegistry;
use crate::core::entity::CharacterRef;
use crate::core::World;
use crate::damage::{Damage, DamageSource};
use crate::error::Result;
use crate::undo::UndoAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetArg {
    pub source: DamageSource,
    pub target: CharacterRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetAction {
    Sequence(Vec<TargetAction>),
    Guard {
        condition: Condition,
        action: Box<TargetAction>,
    },
    Atomic(Box<TargetAction>),

    /// Damage created by the source, so modifiers apply.
    Damage(i32),
    /// Damage rolled once in `[min, max]`.
    DamageRange { min: i32, max: i32 },
    /// Restore health. Not boosted by damage modifiers.
    Heal(i32),
    /// Run a minion action on the target if it is a minion.
    OnMinion(Box<MinionAction>),
}

impl TargetAction {
    pub fn guard(condition: Condition, action: TargetAction) -> Self {
        Self::Guard {
            condition,
            action: Box::new(action),
        }
    }

    pub fn on_minion(action: MinionAction) -> Self {
        Self::OnMinion(Box::new(action))
    }

    pub fn validate(&self, registry: &CardRegistry) -> std::result::Result<(), String> {
        match self {
            Self::Sequence(actions) => actions.iter().try_for_each(|a| a.validate(registry)),
            Self::Guard { action, .. } | Self::Atomic(action) => action.validate(registry),
            Self::DamageRange { min, max } if min > max => {
                Err(format!("damage range {min}..={max} is empty"))
            }
            Self::Heal(amount) if *amount < 0 => Err(format!("heal amount {amount} is negative")),
            Self::OnMinion(action) => action.validate(registry),
            _ => Ok(()),
        }
    }
}

impl WorldAction for TargetAction {
    type Arg = TargetArg;

    fn alter_world(&self, world: &mut World, arg: TargetArg) -> Result<UndoAction> {
        match self {
            Self::Sequence(actions) => sequence(world, actions, arg),
            Self::Guard { condition, action } => {
                let holds = match world.source_owner(arg.source) {
                    Some(player) => {
                        let ctx = ConditionContext::new(player, Some(arg.target));
                        ConditionEvaluator::evaluate(condition, world, &ctx)
                    }
                    None => false,
                };
                guard(world, holds, action.as_ref(), arg)
            }
            Self::Atomic(action) => atomic(world, action.as_ref(), arg),
            Self::Damage(amount) => Ok(world.deal_damage(arg.source, *amount, arg.target)?.into_undo()),
            Self::DamageRange { min, max } => {
                let amount = world.rng().roll(*min, *max);
                Ok(world.deal_damage(arg.source, amount, arg.target)?.into_undo())
            }
            Self::Heal(amount) => Ok(world
                .damage_character(Damage::new(arg.source, -amount), arg.target)?
                .into_undo()),
            Self::OnMinion(action) => match arg.target {
                CharacterRef::Minion(minion) => action.alter_world(world, minion),
                CharacterRef::Hero(_) => Ok(UndoAction::noop()),
            },
        }
    }
}
