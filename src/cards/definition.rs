//! Card templates - static card data.
//!
//! A `CardDefinition` holds what never changes about a card: its printed
//! cost, type, keywords, the minion it summons and the actions it runs when
//! played. Runtime state (current cost, damage taken, buffs) lives on the
//! instances created from it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::actions::{CardPlayAction, MinionAction};
use crate::values::{Modifier, ModifierScope};

/// Identifier of a card template (not of an instance in a game).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Minion,
    Spell,
    Weapon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Taunt,
    Charge,
    DivineShield,
    Stealth,
    Windfury,
    Beast,
    Murloc,
    Demon,
    Mech,
    Pirate,
    Dragon,
    Totem,
}

pub(crate) type Keywords = SmallVec<[Keyword; 4]>;

/// A fixed cost rule printed on a card.
///
/// Adjusters are pure functions of the running cost and are installed as a
/// permanent modifier when a card instance is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManaCostAdjuster {
    Add(i32),
    AtLeast(i32),
    AtMost(i32),
}

impl ManaCostAdjuster {
    #[must_use]
    pub fn adjust(self, cost: i32) -> i32 {
        match self {
            Self::Add(delta) => cost.saturating_add(delta),
            Self::AtLeast(min) => cost.max(min),
            Self::AtMost(max) => cost.min(max),
        }
    }

    /// Fold a list of adjusters into one permanent modifier.
    pub(crate) fn combined(adjusters: &[ManaCostAdjuster]) -> Option<Modifier<i32>> {
        if adjusters.is_empty() {
            return None;
        }
        let adjusters = adjusters.to_vec();
        let modifier = Modifier::new(move |cost| {
            adjusters.iter().fold(cost, |cost, adjuster| adjuster.adjust(cost))
        });
        Some(modifier.with_scope(ModifierScope::Permanent))
    }
}

/// Static minion data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinionDefinition {
    /// The card this minion comes from. Filled in on registration.
    #[serde(default)]
    pub card: CardId,

    /// Defaults to the card's name on registration.
    #[serde(default)]
    pub name: String,

    pub attack: i32,
    pub health: i32,

    #[serde(default)]
    pub keywords: Keywords,

    /// Runs on the minion after it is played from hand.
    #[serde(default)]
    pub battlecry: Option<MinionAction>,
}

impl MinionDefinition {
    #[must_use]
    pub fn new(card: CardId, name: impl Into<String>, attack: i32, health: i32) -> Self {
        Self {
            card,
            name: name.into(),
            attack,
            health,
            keywords: Keywords::new(),
            battlecry: None,
        }
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }
}

/// Static card data.
///
/// ```
/// use brazier_core::cards::{CardDefinition, CardId, CardType, Keyword};
///
/// let ogre = CardDefinition::minion(CardId::new(1), "Boulderfist Ogre", 6, 6, 7)
///     .with_keyword(Keyword::Taunt);
///
/// assert_eq!(ogre.card_type, CardType::Minion);
/// assert_eq!(ogre.minion.as_ref().map(|m| m.health), Some(7));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub card_type: CardType,
    pub mana_cost: i32,

    #[serde(default)]
    pub cost_adjusters: Vec<ManaCostAdjuster>,

    #[serde(default)]
    pub keywords: Keywords,

    #[serde(default)]
    pub minion: Option<Arc<MinionDefinition>>,

    #[serde(default)]
    pub on_play: Vec<CardPlayAction>,
}

impl CardDefinition {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, card_type: CardType, mana_cost: i32) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            mana_cost,
            cost_adjusters: Vec::new(),
            keywords: Keywords::new(),
            minion: None,
            on_play: Vec::new(),
        }
    }

    /// A minion card; minion keywords mirror the card's keywords.
    #[must_use]
    pub fn minion(id: CardId, name: impl Into<String>, mana_cost: i32, attack: i32, health: i32) -> Self {
        let name = name.into();
        let minion = MinionDefinition::new(id, name.clone(), attack, health);
        let mut card = Self::new(id, name, CardType::Minion, mana_cost);
        card.minion = Some(Arc::new(minion));
        card
    }

    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, mana_cost: i32) -> Self {
        Self::new(id, name, CardType::Spell, mana_cost)
    }

    /// Add a keyword to the card and its minion (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
        if let Some(minion) = self.minion.as_mut() {
            let minion = Arc::make_mut(minion);
            if !minion.keywords.contains(&keyword) {
                minion.keywords.push(keyword);
            }
        }
        self
    }

    #[must_use]
    pub fn with_cost_adjuster(mut self, adjuster: ManaCostAdjuster) -> Self {
        self.cost_adjusters.push(adjuster);
        self
    }

    #[must_use]
    pub fn with_on_play(mut self, action: CardPlayAction) -> Self {
        self.on_play.push(action);
        self
    }

    /// Set the minion's battlecry (builder pattern). Ignored for non-minion cards.
    #[must_use]
    pub fn with_battlecry(mut self, action: MinionAction) -> Self {
        if let Some(minion) = self.minion.as_mut() {
            Arc::make_mut(minion).battlecry = Some(action);
        }
        self
    }

    #[must_use]
    pub fn is_minion_card(&self) -> bool {
        self.minion.is_some()
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }
}
