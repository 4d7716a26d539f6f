//! Conditions guarding actions.
//!
//! A condition is checked against the world and a context naming the acting
//! player and, optionally, the character the action is about.

use serde::{Deserialize, Serialize};

use crate::cards::Keyword;
use crate::core::entity::CharacterRef;
use crate::core::player::PlayerId;
use crate::core::World;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    // === Subject Filters ===

    /// Subject is a minion.
    IsMinion,

    /// Subject is a hero.
    IsHero,

    /// Subject belongs to the acting player.
    IsFriendly,

    /// Subject belongs to another player.
    IsEnemy,

    /// Subject has lost health.
    IsDamaged,

    /// Subject is a minion with the keyword (or the matching active flag).
    HasKeyword(Keyword),

    AttackAtLeast(i32),
    AttackAtMost(i32),

    // === Player Filters ===

    HandSizeAtLeast(usize),

    /// The acting player has room on the board.
    BoardNotFull,

    // === Combinators ===

    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),

    Always,
    Never,
}

impl Condition {
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Add another condition with AND.
    pub fn and(self, other: Condition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            _ => Self::All(vec![self, other]),
        }
    }
}

/// Who is acting, and on what.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionContext {
    pub player: PlayerId,
    pub subject: Option<CharacterRef>,
}

impl ConditionContext {
    #[must_use]
    pub fn new(player: PlayerId, subject: Option<CharacterRef>) -> Self {
        Self { player, subject }
    }
}

pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Conditions about a subject are false when there is none.
    #[must_use]
    pub fn evaluate(condition: &Condition, world: &World, ctx: &ConditionContext) -> bool {
        let minion = || {
            ctx.subject
                .and_then(CharacterRef::as_minion)
                .and_then(|id| world.minion(id))
        };

        match condition {
            Condition::IsMinion => ctx.subject.is_some_and(|s| s.is_minion()),
            Condition::IsHero => ctx.subject.is_some_and(|s| s.is_hero()),
            Condition::IsFriendly => ctx
                .subject
                .and_then(|s| world.character_owner(s))
                .is_some_and(|owner| owner == ctx.player),
            Condition::IsEnemy => ctx
                .subject
                .and_then(|s| world.character_owner(s))
                .is_some_and(|owner| owner != ctx.player),
            Condition::IsDamaged => ctx.subject.is_some_and(|s| world.is_character_damaged(s)),
            Condition::HasKeyword(keyword) => minion().is_some_and(|m| m.has_keyword(*keyword)),
            Condition::AttackAtLeast(min) => minion().is_some_and(|m| m.attack() >= *min),
            Condition::AttackAtMost(max) => minion().is_some_and(|m| m.attack() <= *max),

            Condition::HandSizeAtLeast(min) => world.player(ctx.player).hand.len() >= *min,
            Condition::BoardNotFull => !world.is_board_full(ctx.player),

            Condition::All(conditions) => conditions.iter().all(|c| Self::evaluate(c, world, ctx)),
            Condition::Any(conditions) => conditions.iter().any(|c| Self::evaluate(c, world, ctx)),
            Condition::Not(inner) => !Self::evaluate(inner, world, ctx),

            Condition::Always => true,
            Condition::Never => false,
        }
    }
}
