//! Card instances - runtime card state.
//!
//! A `Card` is one copy of a template in a game. It tracks the state that
//! can change while the card sits in a hand or deck: its owner, its mana
//! cost modifiers and, for minion cards, the minion entity it will put into
//! play.

use std::sync::Arc;

use super::definition::{CardDefinition, CardId, CardType, Keyword, ManaCostAdjuster};
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::undo::UndoAction;
use crate::values::{DynamicValue, Modifier};

#[derive(Clone, Debug)]
pub struct Card {
    id: EntityId,
    owner: PlayerId,
    definition: Arc<CardDefinition>,
    minion: Option<EntityId>,
    pub(crate) mana_cost: DynamicValue<i32>,
}

impl Card {
    pub(crate) fn new(
        id: EntityId,
        owner: PlayerId,
        definition: Arc<CardDefinition>,
        minion: Option<EntityId>,
    ) -> Self {
        let mana_cost = DynamicValue::with_permanent(
            definition.mana_cost,
            ManaCostAdjuster::combined(&definition.cost_adjusters),
        );
        Self {
            id,
            owner,
            definition,
            minion,
            mana_cost,
        }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.definition.id
    }

    #[must_use]
    pub fn definition(&self) -> &Arc<CardDefinition> {
        &self.definition
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The minion this card puts into play, if any.
    #[must_use]
    pub fn minion(&self) -> Option<EntityId> {
        self.minion
    }

    #[must_use]
    pub fn is_minion_card(&self) -> bool {
        self.minion.is_some()
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.definition.card_type == CardType::Spell
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.definition.has_keyword(keyword)
    }

    /// The cost modifier stack, cost adjusters included.
    #[must_use]
    pub fn raw_mana_cost(&self) -> &DynamicValue<i32> {
        &self.mana_cost
    }

    /// The cost actually paid to play the card. Never negative.
    #[must_use]
    pub fn active_mana_cost(&self) -> i32 {
        self.mana_cost.value().max(0)
    }

    /// Reduce the cost until the returned undo runs.
    pub fn decrease_mana_cost(&mut self, amount: i32) -> UndoAction<Card> {
        if amount == 0 {
            return UndoAction::noop();
        }
        self.mana_cost
            .add_modifier(Modifier::add(-amount))
            .lift(|card: &mut Card| Some(&mut card.mana_cost))
    }
}
