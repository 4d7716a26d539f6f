//! # brazier-core
//!
//! A Hearthstone-style card game rules engine in which every state change
//! is undoable.
//!
//! ## Design Principles
//!
//! 1. **Reversible by construction**: every mutation returns an
//!    [`UndoAction`]. Composite effects roll back their own partial work
//!    when a step fails.
//!
//! 2. **Arena ownership**: the [`World`] owns all entities; cards, minions
//!    and players refer to each other by id.
//!
//! 3. **Content as data**: card effects are serde-serializable action
//!    enums, validated when a [`CardRegistry`] is loaded.
//!
//! ## Modules
//!
//! - `undo`: undo handles, builders and undoable results
//! - `values`: modifier stacks for attack, health, cost and flags
//! - `core`: ids, players, RNG, configuration, logging and the `World`
//! - `cards`: card templates, instances and the registry
//! - `board`: minions, heroes and zone operations
//! - `events`: domain events, listeners and atomic scopes
//! - `damage`: damage creation and resolution
//! - `actions`: the declarative action catalog and `play_card`

pub mod actions;
pub mod board;
pub mod cards;
pub mod core;
pub mod damage;
pub mod error;
pub mod events;
pub mod undo;
pub mod values;

pub use crate::actions::{
    Ability, AbilityTrigger, CardPlayAction, CardPlayArg, Condition, DeathrattleAction, MinionAction,
    TargetAction, TargetArg, WorldAction,
};
pub use crate::board::{Hero, Minion, MinionFlag, PlayerState};
pub use crate::cards::{Card, CardDefinition, CardId, CardRegistry, CardType, Keyword, MinionDefinition};
pub use crate::core::{
    CharacterRef, EntityId, GameRng, PlayerId, RandomProvider, SessionExpiry, World, WorldConfig,
};
pub use crate::damage::{Damage, DamageSource};
pub use crate::error::{EngineError, Result};
pub use crate::events::{DomainEvent, EventKind, ListenerId};
pub use crate::undo::{UndoAction, UndoBuilder, Undoable};
pub use crate::values::{DynamicValue, Modifier, ModifierScope};
