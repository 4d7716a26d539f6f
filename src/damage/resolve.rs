use super::{Damage, DamageSource};
use crate::board::zones::lift_minion;
use crate::board::MinionFlag;
use crate::core::entity::{CharacterRef, EntityId};
use crate::core::player::PlayerId;
use crate::core::World;
use crate::error::{EngineError, Result};
use crate::events::DomainEvent;
use crate::undo::{UndoAction, UndoBuilder, Undoable};
use crate::values::ModifierScope;

impl World {
    /// The player controlling a damage source.
    #[must_use]
    pub fn source_owner(&self, source: DamageSource) -> Option<PlayerId> {
        match source {
            DamageSource::Minion(minion) => self.minion(minion).map(|m| m.owner()),
            DamageSource::Card(card) => self.card(card).map(|c| c.owner()),
            DamageSource::Hero(player) => Some(player),
        }
    }

    #[must_use]
    pub fn character_owner(&self, target: CharacterRef) -> Option<PlayerId> {
        match target {
            CharacterRef::Hero(player) => self.players.try_get(player).map(|_| player),
            CharacterRef::Minion(minion) => self.minion(minion).map(|m| m.owner()),
        }
    }

    #[must_use]
    pub fn character_health(&self, target: CharacterRef) -> Option<i32> {
        match target {
            CharacterRef::Hero(player) => self.players.try_get(player).map(|p| p.hero.health),
            CharacterRef::Minion(minion) => self.minion(minion).map(|m| m.health()),
        }
    }

    #[must_use]
    pub fn is_character_damaged(&self, target: CharacterRef) -> bool {
        match target {
            CharacterRef::Hero(player) => self.players.try_get(player).is_some_and(|p| p.hero.is_damaged()),
            CharacterRef::Minion(minion) => self.minion(minion).is_some_and(|m| m.is_damaged()),
        }
    }

    /// Turn a raw amount into the damage `source` actually deals.
    ///
    /// - minion: folded through its outgoing damage modifiers
    /// - minion card: as its minion
    /// - spell card: boosted by the owner's spell damage
    /// - anything else: the raw amount
    pub fn create_damage(&mut self, source: DamageSource, raw: i32) -> Undoable<Damage> {
        let amount = match source {
            DamageSource::Minion(minion) => self.minion(minion).map_or(raw, |m| m.outgoing_damage(raw)),
            DamageSource::Card(card) => match self.card(card) {
                Some(card) => match card.minion().and_then(|m| self.minion(m)) {
                    Some(minion) => {
                        return Undoable::unchanged(Damage::new(
                            DamageSource::Minion(minion.id()),
                            minion.outgoing_damage(raw),
                        ))
                    }
                    None if card.is_spell() => self.players[card.owner()].spell_damage(raw),
                    None => raw,
                },
                None => raw,
            },
            DamageSource::Hero(_) => raw,
        };
        Undoable::unchanged(Damage::new(source, amount))
    }

    /// Create damage from `source` and apply it to `target`.
    pub fn deal_damage(
        &mut self,
        source: DamageSource,
        raw: i32,
        target: CharacterRef,
    ) -> Result<Undoable<i32>> {
        let mut undo = UndoBuilder::new();
        let damage = undo.add_result(self.create_damage(source, raw));
        match self.damage_character(damage, target) {
            Ok(dealt) => {
                let dealt = undo.add_result(dealt);
                Ok(Undoable::new(dealt, undo.build()))
            }
            Err(err) => {
                undo.rollback(self);
                Err(err)
            }
        }
    }

    /// Apply damage to a character.
    ///
    /// The result is the health the target lost; healing yields a negative
    /// number. Immune minions take nothing and divine shield absorbs a
    /// whole hit. Armor soaks hero damage first. A minion brought to zero
    /// health dies.
    pub fn damage_character(&mut self, damage: Damage, target: CharacterRef) -> Result<Undoable<i32>> {
        if damage.amount == 0 {
            return Ok(Undoable::unchanged(0));
        }
        match target {
            CharacterRef::Hero(player) => self.damage_hero(damage, player),
            CharacterRef::Minion(minion) => self.damage_minion(damage, minion),
        }
    }

    fn damage_hero(&mut self, damage: Damage, player: PlayerId) -> Result<Undoable<i32>> {
        let Some(state) = self.players.try_get_mut(player) else {
            return Err(EngineError::invariant(format!("no hero for {player}")));
        };
        let previous = state.hero;
        let hero = &mut state.hero;

        let lost = if damage.is_heal() {
            let healed = (-damage.amount).min(hero.max_health - hero.health).max(0);
            hero.health += healed;
            -healed
        } else {
            let absorbed = hero.armor.min(damage.amount);
            hero.armor -= absorbed;
            hero.health -= damage.amount - absorbed;
            damage.amount - absorbed
        };
        if *hero == previous {
            return Ok(Undoable::unchanged(0));
        }

        let mut undo = UndoBuilder::new();
        undo.add(UndoAction::new(move |world: &mut World| {
            world.players[player].hero = previous;
        }));
        if !damage.is_heal() {
            self.log
                .normal("damage", format!("{player} hero takes {} ({lost} to health)", damage.amount));
            let event = DomainEvent::DamageDealt {
                source: damage.source,
                target: CharacterRef::Hero(player),
                amount: damage.amount,
            };
            match self.publish(event) {
                Ok(step) => undo.add(step),
                Err(err) => {
                    undo.rollback(self);
                    return Err(err);
                }
            }
        }
        Ok(Undoable::new(lost, undo.build()))
    }

    fn damage_minion(&mut self, damage: Damage, id: EntityId) -> Result<Undoable<i32>> {
        let Some(minion) = self.minions.get_mut(&id).filter(|m| !m.is_dead()) else {
            return Ok(Undoable::unchanged(0));
        };

        if damage.is_heal() {
            let healed = (-damage.amount).min(minion.damage_taken);
            let undo = minion.set_damage_taken(minion.damage_taken - healed);
            return Ok(Undoable::new(-healed, lift_minion(id, undo)));
        }
        if minion.has(MinionFlag::Immune) {
            return Ok(Undoable::unchanged(0));
        }
        if minion.has(MinionFlag::DivineShield) {
            let undo = minion.set_flag(MinionFlag::DivineShield, false, ModifierScope::Removable);
            self.log.normal("damage", format!("{id} loses divine shield"));
            return Ok(Undoable::new(0, lift_minion(id, undo)));
        }

        let mut undo = UndoBuilder::new();
        undo.add(lift_minion(id, minion.set_damage_taken(minion.damage_taken + damage.amount)));
        self.log.normal("damage", format!("{id} takes {}", damage.amount));

        let event = DomainEvent::DamageDealt {
            source: damage.source,
            target: CharacterRef::Minion(id),
            amount: damage.amount,
        };
        let followup = self.publish(event).and_then(|published| {
            undo.add(published);
            // Listeners may have healed or buffed the target.
            let lethal = self.minion(id).is_some_and(|m| !m.is_dead() && m.health() <= 0);
            if lethal {
                self.kill_minion(id)
            } else {
                Ok(UndoAction::noop())
            }
        });
        match followup {
            Ok(step) => undo.add(step),
            Err(err) => {
                undo.rollback(self);
                return Err(err);
            }
        }
        Ok(Undoable::new(damage.amount, undo.build()))
    }

    /// Add armor to a player's hero and announce it.
    pub fn gain_armor(&mut self, player: PlayerId, amount: i32) -> Result<UndoAction> {
        if amount <= 0 {
            return Ok(UndoAction::noop());
        }
        let Some(state) = self.players.try_get_mut(player) else {
            return Err(EngineError::invariant(format!("no hero for {player}")));
        };
        state.hero.armor += amount;

        let mut undo = UndoBuilder::new();
        undo.add(UndoAction::new(move |world: &mut World| {
            world.players[player].hero.armor -= amount;
        }));
        match self.publish(DomainEvent::ArmorGained { hero: player, amount }) {
            Ok(step) => undo.add(step),
            Err(err) => {
                undo.rollback(self);
                return Err(err);
            }
        }
        Ok(undo.build())
    }
}
