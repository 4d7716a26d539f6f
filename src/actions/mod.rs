//! Declarative game actions.
//!
//! Card content describes what happens with these data types; the engine
//! interprets them through [`WorldAction::alter_world`]:
//!
//! - [`MinionAction`]: acts on a minion (battlecries, buffs, summons)
//! - [`TargetAction`]: a source acting on a chosen character
//! - [`CardPlayAction`]: runs when a card is played
//! - [`DeathrattleAction`]: runs when the minion carrying it dies
//!
//! All of them compose with sequences, the first three also with guards
//! and atomic scopes. They serialize with serde so content can be
//! authored as JSON.

mod ability;
mod card_play;
mod combinators;
mod condition;
mod minion;
mod play;
mod target;

pub use ability::{Ability, AbilityTrigger, DeathrattleAction, DeathrattleArg};
pub use card_play::{CardPlayAction, CardPlayArg};
pub use combinators::{atomic, guard, sequence, transaction, WorldAction};
pub use condition::{Condition, ConditionContext, ConditionEvaluator};
pub use minion::MinionAction;
pub use target::{TargetAction, TargetArg};

use crate::cards::{CardId, CardRegistry};

fn require_card(registry: &CardRegistry, card: CardId) -> std::result::Result<(), String> {
    registry.require(card).map(|_| ()).map_err(|err| err.to_string())
}

fn require_minion(registry: &CardRegistry, card: CardId) -> std::result::Result<(), String> {
    registry.minion_of(card).map(|_| ()).map_err(|err| err.to_string())
}
