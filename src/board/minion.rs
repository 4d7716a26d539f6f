//! Minion instances.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Keyword, MinionDefinition};
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::undo::{UndoAction, UndoBuilder};
use crate::values::{DynamicValue, Modifier, ModifierScope};

/// Boolean abilities a minion can gain or lose during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinionFlag {
    Taunt,
    Stealth,
    DivineShield,
    Charge,
    Immune,
}

impl MinionFlag {
    fn keyword(self) -> Option<Keyword> {
        match self {
            Self::Taunt => Some(Keyword::Taunt),
            Self::Stealth => Some(Keyword::Stealth),
            Self::DivineShield => Some(Keyword::DivineShield),
            Self::Charge => Some(Keyword::Charge),
            Self::Immune => None,
        }
    }
}

/// A minion entity. It may sit on a board or wait inside a card in hand.
#[derive(Clone, Debug)]
pub struct Minion {
    id: EntityId,
    owner: PlayerId,
    template: Arc<MinionDefinition>,
    pub(crate) attack: DynamicValue<i32>,
    pub(crate) max_health: DynamicValue<i32>,
    pub(crate) damage_taken: i32,
    /// Folds raw damage this minion deals.
    pub(crate) outgoing_damage: DynamicValue<i32>,
    taunt: DynamicValue<bool>,
    stealth: DynamicValue<bool>,
    divine_shield: DynamicValue<bool>,
    charge: DynamicValue<bool>,
    immune: DynamicValue<bool>,
    pub(crate) dead: bool,
}

impl Minion {
    pub(crate) fn new(id: EntityId, owner: PlayerId, template: Arc<MinionDefinition>) -> Self {
        let flag = |flag: MinionFlag| {
            DynamicValue::new(flag.keyword().is_some_and(|k| template.has_keyword(k)))
        };
        Self {
            id,
            owner,
            attack: DynamicValue::new(template.attack),
            max_health: DynamicValue::new(template.health),
            damage_taken: 0,
            outgoing_damage: DynamicValue::new(0),
            taunt: flag(MinionFlag::Taunt),
            stealth: flag(MinionFlag::Stealth),
            divine_shield: flag(MinionFlag::DivineShield),
            charge: flag(MinionFlag::Charge),
            immune: flag(MinionFlag::Immune),
            dead: false,
            template,
        }
    }

    /// Copy of this minion's current state under a new identity.
    pub(crate) fn copy_as(&self, id: EntityId, owner: PlayerId) -> Self {
        Self {
            id,
            owner,
            dead: false,
            ..self.clone()
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
    pub fn template(&self) -> &Arc<MinionDefinition> {
        &self.template
    }

    /// The card this minion is summoned from.
    #[must_use]
    pub fn base_card(&self) -> CardId {
        self.template.card
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.template.name
    }

    #[must_use]
    pub fn attack(&self) -> i32 {
        self.attack.value()
    }

    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.max_health.value()
    }

    #[must_use]
    pub fn health(&self) -> i32 {
        self.max_health() - self.damage_taken
    }

    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.damage_taken > 0
    }

    /// Killed (it may still sit in the arena for undo and references).
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    #[must_use]
    pub fn has(&self, flag: MinionFlag) -> bool {
        self.flag(flag).value()
    }

    /// Template keyword, or a currently active flag for flag keywords.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        let flag = match keyword {
            Keyword::Taunt => MinionFlag::Taunt,
            Keyword::Stealth => MinionFlag::Stealth,
            Keyword::DivineShield => MinionFlag::DivineShield,
            Keyword::Charge => MinionFlag::Charge,
            _ => return self.template.has_keyword(keyword),
        };
        self.has(flag)
    }

    /// Fold a raw damage amount through this minion's outgoing modifiers.
    #[must_use]
    pub fn outgoing_damage(&self, raw: i32) -> i32 {
        self.outgoing_damage.derive_from(raw)
    }

    fn flag(&self, flag: MinionFlag) -> &DynamicValue<bool> {
        match flag {
            MinionFlag::Taunt => &self.taunt,
            MinionFlag::Stealth => &self.stealth,
            MinionFlag::DivineShield => &self.divine_shield,
            MinionFlag::Charge => &self.charge,
            MinionFlag::Immune => &self.immune,
        }
    }

    pub(crate) fn flag_mut(&mut self, flag: MinionFlag) -> &mut DynamicValue<bool> {
        match flag {
            MinionFlag::Taunt => &mut self.taunt,
            MinionFlag::Stealth => &mut self.stealth,
            MinionFlag::DivineShield => &mut self.divine_shield,
            MinionFlag::Charge => &mut self.charge,
            MinionFlag::Immune => &mut self.immune,
        }
    }

    pub fn set_flag(&mut self, flag: MinionFlag, value: bool, scope: ModifierScope) -> UndoAction<Minion> {
        self.flag_mut(flag)
            .add_modifier(Modifier::set(value).with_scope(scope))
            .lift(move |minion: &mut Minion| Some(minion.flag_mut(flag)))
    }

    pub fn buff_attack(&mut self, amount: i32) -> UndoAction<Minion> {
        if amount == 0 {
            return UndoAction::noop();
        }
        self.attack
            .add_modifier(Modifier::add(amount))
            .lift(|minion: &mut Minion| Some(&mut minion.attack))
    }

    /// Raise (or lower) maximum health. Current health moves with it.
    pub fn buff_max_health(&mut self, amount: i32) -> UndoAction<Minion> {
        if amount == 0 {
            return UndoAction::noop();
        }
        self.max_health
            .add_modifier(Modifier::add(amount))
            .lift(|minion: &mut Minion| Some(&mut minion.max_health))
    }

    pub fn multiply_attack(&mut self, factor: i32) -> UndoAction<Minion> {
        self.attack
            .add_modifier(Modifier::multiply(factor))
            .lift(|minion: &mut Minion| Some(&mut minion.attack))
    }

    pub fn set_attack(&mut self, attack: i32) -> UndoAction<Minion> {
        self.attack
            .set_value_to(attack)
            .lift(|minion: &mut Minion| Some(&mut minion.attack))
    }

    /// Set maximum health and fully heal.
    pub fn set_max_health(&mut self, health: i32) -> UndoAction<Minion> {
        let mut undo = UndoBuilder::new();
        undo.add(
            self.max_health
                .set_value_to(health)
                .lift(|minion: &mut Minion| Some(&mut minion.max_health)),
        );
        undo.add(self.set_damage_taken(0));
        undo.build()
    }

    /// Set current health, raising maximum health when needed.
    pub fn set_current_health(&mut self, health: i32) -> UndoAction<Minion> {
        let mut undo = UndoBuilder::new();
        if health > self.max_health() {
            undo.add(
                self.max_health
                    .set_value_to(health)
                    .lift(|minion: &mut Minion| Some(&mut minion.max_health)),
            );
        }
        undo.add(self.set_damage_taken(self.max_health() - health));
        undo.build()
    }

    pub(crate) fn set_damage_taken(&mut self, damage_taken: i32) -> UndoAction<Minion> {
        let previous = self.damage_taken;
        if previous == damage_taken {
            return UndoAction::noop();
        }
        self.damage_taken = damage_taken;
        UndoAction::new(move |minion: &mut Minion| minion.damage_taken = previous)
    }

    /// Strip session-scoped modifiers from every value of this minion.
    pub fn expire_session(&mut self) -> UndoAction<Minion> {
        let mut undo = UndoBuilder::new();
        undo.add(
            self.attack
                .expire_session()
                .lift(|minion: &mut Minion| Some(&mut minion.attack)),
        );
        undo.add(
            self.max_health
                .expire_session()
                .lift(|minion: &mut Minion| Some(&mut minion.max_health)),
        );
        undo.add(
            self.outgoing_damage
                .expire_session()
                .lift(|minion: &mut Minion| Some(&mut minion.outgoing_damage)),
        );
        for flag in [
            MinionFlag::Taunt,
            MinionFlag::Stealth,
            MinionFlag::DivineShield,
            MinionFlag::Charge,
            MinionFlag::Immune,
        ] {
            undo.add(
                self.flag_mut(flag)
                    .expire_session()
                    .lift(move |minion: &mut Minion| Some(minion.flag_mut(flag))),
            );
        }
        undo.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minion() -> Minion {
        let mut template = MinionDefinition::new(CardId::new(1), "Guardian", 2, 4);
        template.keywords.push(Keyword::Taunt);
        Minion::new(EntityId(1), PlayerId(0), Arc::new(template))
    }

    #[test]
    fn test_template_keywords_seed_flags() {
        let minion = minion();
        assert!(minion.has(MinionFlag::Taunt));
        assert!(!minion.has(MinionFlag::DivineShield));
        assert!(minion.has_keyword(Keyword::Taunt));
    }

    #[test]
    fn test_buffs_and_undo() {
        let mut minion = minion();
        let attack = minion.buff_attack(3);
        let health = minion.buff_max_health(2);
        assert_eq!((minion.attack(), minion.health()), (5, 6));

        health.undo(&mut minion);
        attack.undo(&mut minion);
        assert_eq!((minion.attack(), minion.health()), (2, 4));
    }

    #[test]
    fn test_double_attack_after_buff() {
        let mut minion = minion();
        let _ = minion.buff_attack(1);
        let _ = minion.multiply_attack(2);
        assert_eq!(minion.attack(), 6);
    }

    #[test]
    fn test_set_current_health_above_max() {
        let mut minion = minion();
        minion.damage_taken = 3;

        let undo = minion.set_current_health(6);
        assert_eq!((minion.health(), minion.max_health()), (6, 6));

        undo.undo(&mut minion);
        assert_eq!((minion.health(), minion.max_health()), (1, 4));
    }

    #[test]
    fn test_set_max_health_heals() {
        let mut minion = minion();
        minion.damage_taken = 2;
        let undo = minion.set_max_health(1);
        assert_eq!(minion.health(), 1);
        assert!(!minion.is_damaged());
        undo.undo(&mut minion);
        assert_eq!(minion.health(), 2);
    }

    #[test]
    fn test_session_flag_expires() {
        let mut minion = minion();
        let _ = minion.set_flag(MinionFlag::Immune, true, ModifierScope::Session);
        let _ = minion.set_flag(MinionFlag::Stealth, true, ModifierScope::Removable);

        let undo = minion.expire_session();
        assert!(!minion.has(MinionFlag::Immune));
        assert!(minion.has(MinionFlag::Stealth));

        undo.undo(&mut minion);
        assert!(minion.has(MinionFlag::Immune));
    }

    #[test]
    fn test_copy_keeps_state() {
        let mut original = minion();
        let _ = original.buff_attack(4);
        original.damage_taken = 1;

        let copy = original.copy_as(EntityId(9), PlayerId(1));
        assert_eq!(copy.id(), EntityId(9));
        assert_eq!(copy.owner(), PlayerId(1));
        assert_eq!((copy.attack(), copy.health()), (6, 3));
    }
}
