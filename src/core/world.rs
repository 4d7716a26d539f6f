//! The world: one arena owning every entity of a game.
//!
//! Entities refer to each other by id ([`EntityId`], [`PlayerId`]), never by
//! pointer. Every mutation goes through a `World` method that returns an
//! [`UndoAction`]; running it restores the state as it was before the call.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::config::WorldConfig;
use super::entity::EntityId;
use super::log::EngineLog;
use super::player::{PlayerId, PlayerMap};
use super::rng::{GameRng, RandomProvider};
use crate::board::{Minion, PlayerState};
use crate::cards::{Card, CardDefinition, CardId, CardRegistry, MinionDefinition};
use crate::error::{EngineError, Result};
use crate::events::EventBus;
use crate::undo::{UndoAction, UndoBuilder, Undoable};

pub struct World {
    config: WorldConfig,
    registry: Arc<CardRegistry>,
    pub(crate) players: PlayerMap<PlayerState>,
    pub(crate) cards: FxHashMap<EntityId, Card>,
    pub(crate) minions: FxHashMap<EntityId, Minion>,
    pub(crate) events: EventBus,
    rng: Box<dyn RandomProvider + Send>,
    pub(crate) log: EngineLog,
    next_entity_id: u32,
}

impl World {
    /// Create a world with empty zones for every player.
    ///
    /// Panics if `config.player_count` is zero or exceeds 255; configs loaded
    /// through [`WorldConfig::from_json`] are checked up front.
    pub fn new(
        config: WorldConfig,
        registry: Arc<CardRegistry>,
        rng: Box<dyn RandomProvider + Send>,
    ) -> Self {
        let players = PlayerMap::new(config.player_count, |id| {
            PlayerState::new(id, config.hero_health, config.starting_mana)
        });
        let log = EngineLog::with_verbosity(config.verbosity);
        Self {
            config,
            registry,
            players,
            cards: FxHashMap::default(),
            minions: FxHashMap::default(),
            events: EventBus::new(),
            rng,
            log,
            next_entity_id: 1,
        }
    }

    /// Create a world driven by a seeded [`GameRng`].
    pub fn with_seed(config: WorldConfig, registry: Arc<CardRegistry>, seed: u64) -> Self {
        Self::new(config, registry, Box::new(GameRng::new(seed)))
    }

    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<CardRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// The player after `player` in turn order.
    #[must_use]
    pub fn opponent_of(&self, player: PlayerId) -> PlayerId {
        player.next(self.player_count())
    }

    /// Panics if `player` is out of range.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    /// Direct mutable access. Changes made through it are not recorded.
    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    #[must_use]
    pub fn card(&self, id: EntityId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Direct mutable access. Changes made through it are not recorded.
    pub fn card_mut(&mut self, id: EntityId) -> Option<&mut Card> {
        self.cards.get_mut(&id)
    }

    #[must_use]
    pub fn minion(&self, id: EntityId) -> Option<&Minion> {
        self.minions.get(&id)
    }

    /// Direct mutable access. Changes made through it are not recorded.
    pub fn minion_mut(&mut self, id: EntityId) -> Option<&mut Minion> {
        self.minions.get_mut(&id)
    }

    /// Every minion entity, in id order.
    pub fn minions(&self) -> impl Iterator<Item = &Minion> {
        let mut minions: Vec<_> = self.minions.values().collect();
        minions.sort_unstable_by_key(|m| m.id());
        minions.into_iter()
    }

    /// Every card entity, in id order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        let mut cards: Vec<_> = self.cards.values().collect();
        cards.sort_unstable_by_key(|c| c.id());
        cards.into_iter()
    }

    pub(crate) fn require_card(&self, id: EntityId) -> Result<&Card> {
        self.cards
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} is not a card")))
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    #[must_use]
    pub fn log(&self) -> &EngineLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut EngineLog {
        &mut self.log
    }

    pub fn rng(&mut self) -> &mut dyn RandomProvider {
        self.rng.as_mut()
    }

    pub(crate) fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Instantiate a registered card for `owner`. The card is in no zone yet.
    pub fn create_card(&mut self, owner: PlayerId, card: CardId) -> Result<Undoable<EntityId>> {
        let definition = self.registry.require(card)?.clone();
        Ok(self.create_card_from(owner, definition))
    }

    /// Instantiate a card template, along with its minion for minion cards.
    pub fn create_card_from(
        &mut self,
        owner: PlayerId,
        definition: Arc<CardDefinition>,
    ) -> Undoable<EntityId> {
        let mut undo = UndoBuilder::new();
        let minion = match definition.minion.clone() {
            Some(template) => Some(undo.add_result(self.create_minion(owner, template))),
            None => None,
        };

        let id = self.allocate_id();
        self.cards.insert(id, Card::new(id, owner, definition, minion));
        undo.add(UndoAction::new(move |world: &mut World| {
            world.cards.remove(&id);
        }));
        Undoable::new(id, undo.build())
    }

    /// Create a minion entity for `owner`. It is not on the board yet.
    pub fn create_minion(
        &mut self,
        owner: PlayerId,
        template: Arc<MinionDefinition>,
    ) -> Undoable<EntityId> {
        let id = self.allocate_id();
        self.minions.insert(id, Minion::new(id, owner, template));
        Undoable::new(
            id,
            UndoAction::new(move |world: &mut World| {
                world.minions.remove(&id);
            }),
        )
    }

    /// Create a minion entity that copies the current state of `original`.
    pub fn copy_minion(&mut self, original: EntityId, owner: PlayerId) -> Undoable<Option<EntityId>> {
        let Some(copy) = self.minions.get(&original).cloned() else {
            return Undoable::unchanged(None);
        };
        let id = self.allocate_id();
        self.minions.insert(id, copy.copy_as(id, owner));
        Undoable::new(
            Some(id),
            UndoAction::new(move |world: &mut World| {
                world.minions.remove(&id);
            }),
        )
    }

    /// Remove a card entity from the arena.
    ///
    /// The card's own minion goes with it unless that minion is on a board.
    pub fn destroy_card(&mut self, id: EntityId) -> UndoAction {
        let Some(card) = self.cards.remove(&id) else {
            return UndoAction::noop();
        };
        let owned = card.minion().filter(|&minion| !self.is_on_board(minion));
        let minion = owned.and_then(|minion| self.minions.remove(&minion));

        UndoAction::new(move |world: &mut World| {
            if let Some(minion) = minion {
                world.minions.insert(minion.id(), minion);
            }
            world.cards.insert(id, card);
        })
    }

    /// Strip every "until end of turn" modifier from every entity and drop
    /// every session listener.
    pub fn expire_session_modifiers(&mut self) -> UndoAction {
        let mut undo = UndoBuilder::new();

        for (&id, minion) in &mut self.minions {
            undo.add(
                minion
                    .expire_session()
                    .lift(move |world: &mut World| world.minions.get_mut(&id)),
            );
        }
        for (&id, card) in &mut self.cards {
            undo.add(
                card.mana_cost
                    .expire_session()
                    .lift(move |world: &mut World| world.cards.get_mut(&id).map(|c| &mut c.mana_cost)),
            );
        }
        for (player, state) in self.players.iter_mut() {
            undo.add(
                state
                    .spell_damage
                    .expire_session()
                    .lift(move |world: &mut World| Some(&mut world.players[player].spell_damage)),
            );
        }

        undo.add(
            self.events
                .expire_session()
                .lift(|world: &mut World| Some(&mut world.events)),
        );

        if !undo.is_empty() && self.log.enabled(super::log::VerbosityLevel::Verbose) {
            self.log.verbose("world", format!("expired session modifiers on {} values", undo.len()));
        }
        undo.build()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("cards", &self.cards.len())
            .field("minions", &self.minions.len())
            .field("next_entity_id", &self.next_entity_id)
            .finish_non_exhaustive()
    }
}
