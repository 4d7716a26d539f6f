//! Actions performed by (or on) a minion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ability::{Ability, DeathrattleAction};
use super::combinators::{atomic, guard, sequence, transaction, WorldAction};
use super::condition::{Condition, ConditionContext, ConditionEvaluator};
use super::require_minion;
use crate::board::MinionFlag;
use crate::cards::{Card, CardId, CardRegistry, MinionDefinition};
use crate::core::entity::{CharacterRef, EntityId};
use crate::core::player::PlayerId;
use crate::core::World;
use crate::damage::{Damage, DamageSource};
use crate::error::{EngineError, Result};
use crate::undo::{UndoAction, UndoBuilder};
use crate::values::ModifierScope;

/// An action whose argument is a minion.
///
/// Board-relative variants (neighbours, summons beside, returning to hand)
/// read the board layout when they run and do nothing for a minion that is
/// not on the board. Every variant does nothing for a dead minion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinionAction {
    // === Composition ===

    Sequence(Vec<MinionAction>),
    Guard {
        condition: Condition,
        action: Box<MinionAction>,
    },
    Atomic(Box<MinionAction>),

    // === Stats ===

    Buff { attack: i32, health: i32 },
    /// Attack buff rolled once in `[min, max]`.
    BuffAttackRange { min: i32, max: i32 },
    SetAttack(i32),
    SetHealth(i32),
    SetMaxHealth(i32),
    DoubleAttack,
    /// Buff once per other card in the owner's hand.
    BuffPerCardInHand { attack: i32, health: i32 },
    /// Buff once per other card the owner played this turn.
    BuffPerCardPlayed { attack: i32, health: i32 },

    // === Abilities ===

    Taunt,
    Stealth,
    DivineShield,
    Charge,
    ImmuneThisTurn,
    /// Attach a triggered ability for as long as the minion lives.
    AddAbility(Ability),
    /// Attach a triggered ability until session modifiers expire.
    AbilityThisTurn(Ability),
    AddDeathrattle(DeathrattleAction),

    // === Damage ===

    SelfDestruct,
    /// Die, then return as a fresh copy at the end of the board and run
    /// the inner action on the copy.
    Reincarnate(Box<MinionAction>),
    DamageSelf(i32),
    RestoreSelfHealth,
    DamageOwnHero(i32),
    DamageOpponentHero(i32),

    // === Board ===

    /// Run the inner action on the left then the right neighbour.
    BuffNeighbours(Box<MinionAction>),
    /// Run the inner action on the minion, then its current neighbours.
    WithNeighbours(Box<MinionAction>),
    SummonLeft(CardId),
    SummonRight(CardId),
    /// Summon another copy of this minion's template to its right.
    ResummonRight,
    ResummonWithHealth(i32),
    ReturnToHand { cost_reduction: i32 },
    ShuffleIntoDeck,
    /// Transform into one uniformly chosen candidate.
    TransformInto(Vec<CardId>),
    /// Trade places with a random minion card from the owner's hand.
    SwapWithMinionInHand,
    SummonCopyForOpponent,
}

impl MinionAction {
    pub fn sequence(actions: impl IntoIterator<Item = MinionAction>) -> Self {
        Self::Sequence(actions.into_iter().collect())
    }

    pub fn guard(condition: Condition, action: MinionAction) -> Self {
        Self::Guard {
            condition,
            action: Box::new(action),
        }
    }

    pub fn atomic(action: MinionAction) -> Self {
        Self::Atomic(Box::new(action))
    }

    pub fn buff(attack: i32, health: i32) -> Self {
        Self::Buff { attack, health }
    }

    pub fn buff_neighbours(action: MinionAction) -> Self {
        Self::BuffNeighbours(Box::new(action))
    }

    /// Check card references and parameters against `registry`.
    pub fn validate(&self, registry: &CardRegistry) -> std::result::Result<(), String> {
        match self {
            Self::Sequence(actions) => actions.iter().try_for_each(|a| a.validate(registry)),
            Self::Guard { action, .. }
            | Self::Atomic(action)
            | Self::BuffNeighbours(action)
            | Self::WithNeighbours(action)
            | Self::Reincarnate(action) => action.validate(registry),
            Self::AddAbility(ability) | Self::AbilityThisTurn(ability) => ability.action.validate(registry),
            Self::AddDeathrattle(action) => action.validate(registry),
            Self::BuffAttackRange { min, max } if min > max => {
                Err(format!("attack range {min}..={max} is empty"))
            }
            Self::SummonLeft(card) | Self::SummonRight(card) => require_minion(registry, *card),
            Self::TransformInto(candidates) => {
                if candidates.is_empty() {
                    return Err("transform has no candidates".to_string());
                }
                candidates.iter().try_for_each(|card| require_minion(registry, *card))
            }
            Self::ResummonWithHealth(health) if *health <= 0 => {
                Err(format!("resummon health {health} must be positive"))
            }
            _ => Ok(()),
        }
    }
}

impl WorldAction for MinionAction {
    type Arg = EntityId;

    fn alter_world(&self, world: &mut World, minion: EntityId) -> Result<UndoAction> {
        let Some(owner) = world
            .minion(minion)
            .filter(|m| !m.is_dead())
            .map(|m| m.owner())
        else {
            return Ok(UndoAction::noop());
        };
        let this = CharacterRef::Minion(minion);
        let source = DamageSource::Minion(minion);

        match self {
            Self::Sequence(actions) => sequence(world, actions, minion),
            Self::Guard { condition, action } => {
                let ctx = ConditionContext::new(owner, Some(this));
                let holds = ConditionEvaluator::evaluate(condition, world, &ctx);
                guard(world, holds, action.as_ref(), minion)
            }
            Self::Atomic(action) => atomic(world, action.as_ref(), minion),

            Self::Buff { attack, health } => Ok(buff(world, minion, *attack, *health)),
            Self::BuffAttackRange { min, max } => {
                let amount = world.rng().roll(*min, *max);
                Ok(world.update_minion(minion, |m| m.buff_attack(amount)))
            }
            Self::SetAttack(attack) => Ok(world.update_minion(minion, |m| m.set_attack(*attack))),
            Self::SetHealth(health) => {
                Ok(world.update_minion(minion, |m| m.set_current_health(*health)))
            }
            Self::SetMaxHealth(health) => Ok(world.update_minion(minion, |m| m.set_max_health(*health))),
            Self::DoubleAttack => Ok(world.update_minion(minion, |m| m.multiply_attack(2))),
            Self::BuffPerCardInHand { attack, health } => {
                let count = i32::try_from(world.player(owner).hand.len()).unwrap_or(i32::MAX);
                Ok(buff(world, minion, attack.saturating_mul(count), health.saturating_mul(count)))
            }
            Self::BuffPerCardPlayed { attack, health } => {
                let played = world.player(owner).cards_played_this_turn.saturating_sub(1);
                let count = i32::try_from(played).unwrap_or(i32::MAX);
                Ok(buff(world, minion, attack.saturating_mul(count), health.saturating_mul(count)))
            }

            Self::Taunt => Ok(set_flag(world, minion, MinionFlag::Taunt, ModifierScope::Removable)),
            Self::Stealth => Ok(set_flag(world, minion, MinionFlag::Stealth, ModifierScope::Removable)),
            Self::DivineShield => Ok(set_flag(
                world,
                minion,
                MinionFlag::DivineShield,
                ModifierScope::Removable,
            )),
            Self::Charge => Ok(set_flag(world, minion, MinionFlag::Charge, ModifierScope::Removable)),
            Self::ImmuneThisTurn => {
                Ok(set_flag(world, minion, MinionFlag::Immune, ModifierScope::Session))
            }
            Self::AddAbility(ability) => Ok(world
                .attach_ability(minion, ability.clone(), ModifierScope::Removable)
                .into_undo()),
            Self::AbilityThisTurn(ability) => Ok(world
                .attach_ability(minion, ability.clone(), ModifierScope::Session)
                .into_undo()),
            Self::AddDeathrattle(action) => Ok(world.add_deathrattle(minion, action.clone()).into_undo()),

            Self::SelfDestruct => world.kill_minion(minion),
            Self::Reincarnate(action) => {
                let template = minion_template(world, minion)?;
                transaction(world, |world, undo| {
                    undo.add(world.kill_minion(minion)?);
                    let end = world.player(owner).board.len();
                    if let Some(reborn) = undo.add_result(world.summon(owner, template, end)?) {
                        undo.add(action.alter_world(world, reborn)?);
                    }
                    Ok(())
                })
            }
            Self::DamageSelf(amount) => Ok(world.deal_damage(source, *amount, this)?.into_undo()),
            Self::RestoreSelfHealth => {
                let missing = world.minion(minion).map_or(0, |m| m.max_health() - m.health());
                if missing <= 0 {
                    return Ok(UndoAction::noop());
                }
                Ok(world.damage_character(Damage::new(source, -missing), this)?.into_undo())
            }
            Self::DamageOwnHero(amount) => {
                Ok(world.deal_damage(source, *amount, CharacterRef::Hero(owner))?.into_undo())
            }
            Self::DamageOpponentHero(amount) => {
                let opponent = world.opponent_of(owner);
                Ok(world.deal_damage(source, *amount, CharacterRef::Hero(opponent))?.into_undo())
            }

            Self::BuffNeighbours(action) => {
                let (left, right) = world.neighbours(minion);
                transaction(world, |world, undo| {
                    for neighbour in [left, right].into_iter().flatten() {
                        undo.add(action.alter_world(world, neighbour)?);
                    }
                    Ok(())
                })
            }
            Self::WithNeighbours(action) => {
                let (left, right) = world.neighbours(minion);
                transaction(world, |world, undo| {
                    for target in [Some(minion), left, right].into_iter().flatten() {
                        undo.add(action.alter_world(world, target)?);
                    }
                    Ok(())
                })
            }
            Self::SummonLeft(card) => {
                let template = world.registry().minion_of(*card)?;
                Ok(world.summon_left_of(minion, template)?.into_undo())
            }
            Self::SummonRight(card) => {
                let template = world.registry().minion_of(*card)?;
                Ok(world.summon_right_of(minion, template)?.into_undo())
            }
            Self::ResummonRight => {
                let template = minion_template(world, minion)?;
                Ok(world.summon_right_of(minion, template)?.into_undo())
            }
            Self::ResummonWithHealth(health) => {
                let template = minion_template(world, minion)?;
                transaction(world, |world, undo| {
                    if let Some(summoned) = undo.add_result(world.summon_right_of(minion, template)?) {
                        undo.add(world.update_minion(summoned, |m| m.set_current_health(*health)));
                    }
                    Ok(())
                })
            }
            Self::ReturnToHand { cost_reduction } => {
                if !world.is_on_board(minion) {
                    return Ok(UndoAction::noop());
                }
                let base_card = base_card(world, minion)?;
                transaction(world, |world, undo| {
                    undo.add(world.remove_from_board(minion));
                    let card = undo.add_result(world.create_card(owner, base_card)?);
                    undo.add(world.update_card(card, |c| c.decrease_mana_cost(*cost_reduction)));
                    let added = world.add_card_to_hand(card)?;
                    if added.is_noop() {
                        undo.add(world.destroy_card(card));
                    }
                    undo.add(added);
                    Ok(())
                })
            }
            Self::ShuffleIntoDeck => {
                if !world.is_on_board(minion) {
                    return Ok(UndoAction::noop());
                }
                let base_card = base_card(world, minion)?;
                transaction(world, |world, undo| {
                    undo.add(world.remove_from_board(minion));
                    let card = undo.add_result(world.create_card(owner, base_card)?);
                    undo.add(world.put_to_random_deck_position(card)?);
                    Ok(())
                })
            }
            Self::TransformInto(candidates) => {
                let Some(index) = world.rng().pick_index(candidates.len()) else {
                    return Ok(UndoAction::noop());
                };
                let template = world.registry().minion_of(candidates[index])?;
                Ok(world.transform_minion(minion, template))
            }
            Self::SwapWithMinionInHand => swap_with_hand(world, minion, owner),
            Self::SummonCopyForOpponent => {
                let receiver = world.opponent_of(owner);
                if world.is_board_full(receiver) {
                    return Ok(UndoAction::noop());
                }
                transaction(world, |world, undo| {
                    if let Some(copy) = undo.add_result(world.copy_minion(minion, receiver)) {
                        let end = world.player(receiver).board.len();
                        undo.add(world.place_on_board(copy, end)?);
                    }
                    Ok(())
                })
            }
        }
    }
}

fn buff(world: &mut World, minion: EntityId, attack: i32, health: i32) -> UndoAction {
    let mut undo = UndoBuilder::new();
    undo.add(world.update_minion(minion, |m| m.buff_attack(attack)));
    undo.add(world.update_minion(minion, |m| m.buff_max_health(health)));
    undo.build()
}

fn set_flag(world: &mut World, minion: EntityId, flag: MinionFlag, scope: ModifierScope) -> UndoAction {
    world.update_minion(minion, |m| m.set_flag(flag, true, scope))
}

fn minion_template(world: &World, minion: EntityId) -> Result<Arc<MinionDefinition>> {
    world
        .minion(minion)
        .map(|m| m.template().clone())
        .ok_or_else(|| EngineError::invariant(format!("{minion} is not a minion")))
}

fn base_card(world: &World, minion: EntityId) -> Result<CardId> {
    world
        .minion(minion)
        .map(|m| m.base_card())
        .ok_or_else(|| EngineError::invariant(format!("{minion} is not a minion")))
}

/// The chosen hand card's minion takes this minion's board slot, and a
/// fresh copy of this minion's card takes the hand slot.
fn swap_with_hand(world: &mut World, minion: EntityId, owner: PlayerId) -> Result<UndoAction> {
    if !world.is_on_board(minion) {
        return Ok(UndoAction::noop());
    }
    let Some(index) = world.random_hand_index(owner, Card::is_minion_card) else {
        return Ok(UndoAction::noop());
    };
    let base_card = base_card(world, minion)?;

    transaction(world, |world, undo| {
        let card = undo.add_result(world.create_card(owner, base_card)?);
        let replaced = undo
            .add_result(world.replace_in_hand(owner, index, card))
            .ok_or_else(|| EngineError::invariant(format!("hand index {index} vanished")))?;
        let incoming = world
            .card(replaced)
            .and_then(Card::minion)
            .ok_or_else(|| EngineError::invariant(format!("{replaced} swapped from hand has no minion")))?;
        undo.add(world.replace_on_board(minion, incoming));
        Ok(())
    })
}
