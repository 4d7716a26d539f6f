//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card template a world can instantiate.
//! Content authored as JSON is validated when loaded, so a broken action
//! reference is reported before any game starts.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, CardType, MinionDefinition};
use crate::error::{EngineError, Result};

/// Registry of card definitions.
///
/// ```
/// use brazier_core::cards::{CardDefinition, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::minion(CardId::new(1), "Wisp", 0, 1, 1)).unwrap();
///
/// assert_eq!(registry.require(CardId::new(1)).unwrap().name, "Wisp");
/// assert!(registry.require(CardId::new(2)).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Arc<CardDefinition>>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a JSON array of card definitions.
    pub fn from_json(json: &str) -> Result<Self> {
        let definitions: Vec<CardDefinition> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Register a card definition.
    ///
    /// The card's minion is linked back to the card and inherits its name
    /// when none was given.
    pub fn register(&mut self, mut card: CardDefinition) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(EngineError::DuplicateCard(card.id));
        }
        if let Some(minion) = card.minion.as_mut() {
            if minion.card != card.id || minion.name.is_empty() {
                let minion = Arc::make_mut(minion);
                minion.card = card.id;
                if minion.name.is_empty() {
                    minion.name.clone_from(&card.name);
                }
            }
        }
        self.cards.insert(card.id, Arc::new(card));
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Arc<CardDefinition>> {
        self.cards.get(&id)
    }

    /// Get a card definition, failing with `UnknownCard`.
    pub fn require(&self, id: CardId) -> Result<&Arc<CardDefinition>> {
        self.cards.get(&id).ok_or(EngineError::UnknownCard(id))
    }

    /// The minion template of a card, failing when the card has none.
    pub fn minion_of(&self, id: CardId) -> Result<Arc<MinionDefinition>> {
        self.require(id)?
            .minion
            .clone()
            .ok_or(EngineError::MissingMinion(id))
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.cards.values()
    }

    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.cards.values().filter(move |c| c.card_type == card_type)
    }

    /// Check every registered card for authoring defects.
    ///
    /// Cards are checked in id order so the first reported defect is stable.
    pub fn validate(&self) -> Result<()> {
        let mut ids: Vec<_> = self.cards.keys().copied().collect();
        ids.sort_unstable();

        for id in ids {
            let card = &self.cards[&id];
            match (card.card_type, card.minion.as_ref()) {
                (CardType::Minion, None) => {
                    return Err(EngineError::invalid(id, "minion card without a minion"));
                }
                (CardType::Spell | CardType::Weapon, Some(_)) => {
                    return Err(EngineError::invalid(id, "only minion cards may carry a minion"));
                }
                _ => {}
            }
            if let Some(minion) = card.minion.as_ref() {
                if minion.health <= 0 {
                    return Err(EngineError::invalid(id, "minion health must be positive"));
                }
                if let Some(battlecry) = minion.battlecry.as_ref() {
                    battlecry
                        .validate(self)
                        .map_err(|reason| EngineError::invalid(id, reason))?;
                }
            }
            for action in &card.on_play {
                action
                    .validate(self)
                    .map_err(|reason| EngineError::invalid(id, reason))?;
            }
        }
        Ok(())
    }
}
