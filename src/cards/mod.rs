//! Card templates and instances.
//!
//! - [`CardDefinition`] / [`MinionDefinition`]: immutable templates, usually
//!   authored as JSON and loaded into a [`CardRegistry`]
//! - [`Card`]: a card instance owned by a player, with its own mana cost
//!   and (for minion cards) its own minion instance

mod definition;
mod instance;
mod registry;

pub use definition::{CardDefinition, CardId, CardType, Keyword, ManaCostAdjuster, MinionDefinition};
pub use instance::Card;
pub use registry::CardRegistry;
