//! Zone operations: board positions, hand and deck.
//!
//! Board indexes are resolved when an operation runs, so "left of" and
//! "right of" always refer to the current layout.

use std::sync::Arc;

use super::Minion;
use crate::cards::{Card, MinionDefinition};
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::core::World;
use crate::error::{EngineError, Result};
use crate::events::DomainEvent;
use crate::undo::{UndoAction, UndoBuilder, Undoable};

/// Re-target a minion-level undo at the world.
pub(crate) fn lift_minion(id: EntityId, undo: UndoAction<Minion>) -> UndoAction {
    undo.lift(move |world: &mut World| world.minions.get_mut(&id))
}

impl World {
    /// Apply a recorded change to one minion. Missing minions are skipped.
    pub fn update_minion(
        &mut self,
        id: EntityId,
        change: impl FnOnce(&mut Minion) -> UndoAction<Minion>,
    ) -> UndoAction {
        match self.minions.get_mut(&id) {
            Some(minion) => lift_minion(id, change(minion)),
            None => UndoAction::noop(),
        }
    }

    /// Apply a recorded change to one card. Missing cards are skipped.
    pub fn update_card(
        &mut self,
        id: EntityId,
        change: impl FnOnce(&mut Card) -> UndoAction<Card>,
    ) -> UndoAction {
        match self.cards.get_mut(&id) {
            Some(card) => change(card).lift(move |world: &mut World| world.cards.get_mut(&id)),
            None => UndoAction::noop(),
        }
    }

    /// `(owner, index)` of a minion currently on a board.
    #[must_use]
    pub fn board_position(&self, minion: EntityId) -> Option<(PlayerId, usize)> {
        let owner = self.minions.get(&minion)?.owner();
        let index = self.players[owner].board.index_of(&minion)?;
        Some((owner, index))
    }

    #[must_use]
    pub fn is_on_board(&self, minion: EntityId) -> bool {
        self.board_position(minion).is_some()
    }

    /// Alive and reachable by effects.
    #[must_use]
    pub fn is_minion_alive(&self, minion: EntityId) -> bool {
        self.minions.get(&minion).is_some_and(|m| !m.is_dead())
    }

    #[must_use]
    pub fn is_board_full(&self, player: PlayerId) -> bool {
        self.players[player].board.len() >= self.config().max_board_size
    }

    /// Left and right neighbours at the time of the call.
    #[must_use]
    pub fn neighbours(&self, minion: EntityId) -> (Option<EntityId>, Option<EntityId>) {
        let Some((owner, index)) = self.board_position(minion) else {
            return (None, None);
        };
        let board = &self.players[owner].board;
        let left = index.checked_sub(1).and_then(|i| board.get(i).copied());
        let right = board.get(index + 1).copied();
        (left, right)
    }

    /// Put an existing minion entity onto its owner's board.
    ///
    /// Does nothing when the board is full or the minion is already on it.
    pub fn place_on_board(&mut self, minion: EntityId, index: usize) -> Result<UndoAction> {
        let Some(owner) = self.minions.get(&minion).map(|m| m.owner()) else {
            return Err(EngineError::invariant(format!("{minion} is not a minion")));
        };
        if self.is_board_full(owner) || self.is_on_board(minion) {
            return Ok(UndoAction::noop());
        }

        let mut undo = UndoBuilder::new();
        let board = &mut self.players[owner].board;
        let index = index.min(board.len());
        board.insert(index, minion);
        undo.add(UndoAction::new(move |world: &mut World| {
            let removed = world.players[owner].board.remove(index);
            debug_assert_eq!(removed, minion);
        }));

        if self.log.enabled(crate::core::VerbosityLevel::Normal) {
            let name = self.minions[&minion].name().to_string();
            self.log
                .normal("board", format!("{owner} summons {name} ({minion}) at {index}"));
        }

        match self.publish(DomainEvent::MinionSummoned { minion, owner }) {
            Ok(step) => undo.add(step),
            Err(err) => {
                undo.rollback(self);
                return Err(err);
            }
        }
        Ok(undo.build())
    }

    /// Summon a new minion for `player` at `index`.
    ///
    /// The result is `None` (and nothing changes) when the board is full.
    pub fn summon(
        &mut self,
        player: PlayerId,
        template: Arc<MinionDefinition>,
        index: usize,
    ) -> Result<Undoable<Option<EntityId>>> {
        if self.is_board_full(player) {
            return Ok(Undoable::unchanged(None));
        }
        let mut undo = UndoBuilder::new();
        let minion = undo.add_result(self.create_minion(player, template));
        match self.place_on_board(minion, index) {
            Ok(step) => undo.add(step),
            Err(err) => {
                undo.rollback(self);
                return Err(err);
            }
        }
        Ok(Undoable::new(Some(minion), undo.build()))
    }

    /// Summon directly left of `anchor`, on the anchor owner's board.
    pub fn summon_left_of(
        &mut self,
        anchor: EntityId,
        template: Arc<MinionDefinition>,
    ) -> Result<Undoable<Option<EntityId>>> {
        match self.board_position(anchor) {
            Some((owner, index)) => self.summon(owner, template, index),
            None => Ok(Undoable::unchanged(None)),
        }
    }

    /// Summon directly right of `anchor`, on the anchor owner's board.
    pub fn summon_right_of(
        &mut self,
        anchor: EntityId,
        template: Arc<MinionDefinition>,
    ) -> Result<Undoable<Option<EntityId>>> {
        match self.board_position(anchor) {
            Some((owner, index)) => self.summon(owner, template, index + 1),
            None => Ok(Undoable::unchanged(None)),
        }
    }

    /// Take a minion off the board without killing it.
    pub fn remove_from_board(&mut self, minion: EntityId) -> UndoAction {
        let Some((owner, index)) = self.board_position(minion) else {
            return UndoAction::noop();
        };
        self.players[owner].board.remove(index);
        UndoAction::new(move |world: &mut World| {
            world.players[owner].board.insert(index, minion);
        })
    }

    /// Put `replacement` into the board slot held by `minion`.
    pub fn replace_on_board(&mut self, minion: EntityId, replacement: EntityId) -> UndoAction {
        let Some((owner, index)) = self.board_position(minion) else {
            return UndoAction::noop();
        };
        self.players[owner].board.set(index, replacement);
        UndoAction::new(move |world: &mut World| {
            world.players[owner].board.set(index, minion);
        })
    }

    /// Mark a minion dead, remove it from the board and announce it.
    pub fn kill_minion(&mut self, minion: EntityId) -> Result<UndoAction> {
        let Some(state) = self.minions.get_mut(&minion) else {
            return Ok(UndoAction::noop());
        };
        if state.dead {
            return Ok(UndoAction::noop());
        }
        state.dead = true;
        let owner = state.owner();
        let position = self.board_position(minion).map(|(_, index)| index);

        let mut undo = UndoBuilder::new();
        undo.add(UndoAction::new(move |world: &mut World| {
            if let Some(state) = world.minions.get_mut(&minion) {
                state.dead = false;
            }
        }));
        undo.add(self.remove_from_board(minion));
        self.log.normal("board", format!("{minion} dies"));

        match self.publish(DomainEvent::MinionDied { minion, owner, position }) {
            Ok(step) => undo.add(step),
            Err(err) => {
                undo.rollback(self);
                return Err(err);
            }
        }
        Ok(undo.build())
    }

    /// Replace a minion's template in place, discarding all its modifiers.
    pub fn transform_minion(&mut self, minion: EntityId, template: Arc<MinionDefinition>) -> UndoAction {
        let Some(state) = self.minions.get_mut(&minion) else {
            return UndoAction::noop();
        };
        let transformed = Minion::new(minion, state.owner(), template);
        let previous = std::mem::replace(state, transformed);
        UndoAction::new(move |world: &mut World| {
            world.minions.insert(minion, previous);
        })
    }

    /// Append a card to its owner's hand. Does nothing when the hand is full.
    pub fn add_card_to_hand(&mut self, card: EntityId) -> Result<UndoAction> {
        let owner = self.require_card(card)?.owner();
        let max_hand_size = self.config().max_hand_size;
        let hand = &mut self.players[owner].hand;
        if hand.len() >= max_hand_size {
            return Ok(UndoAction::noop());
        }
        hand.push_back(card);
        Ok(UndoAction::new(move |world: &mut World| {
            let removed = world.players[owner].hand.pop_back();
            debug_assert_eq!(removed, Some(card));
        }))
    }

    /// Remove the card at `index` of `player`'s hand.
    pub fn remove_from_hand(&mut self, player: PlayerId, index: usize) -> Undoable<Option<EntityId>> {
        let hand = &mut self.players[player].hand;
        if index >= hand.len() {
            return Undoable::unchanged(None);
        }
        let card = hand.remove(index);
        Undoable::new(
            Some(card),
            UndoAction::new(move |world: &mut World| {
                world.players[player].hand.insert(index, card);
            }),
        )
    }

    /// Swap the card at `index` of `player`'s hand for `card`.
    ///
    /// The result is the card that was replaced.
    pub fn replace_in_hand(
        &mut self,
        player: PlayerId,
        index: usize,
        card: EntityId,
    ) -> Undoable<Option<EntityId>> {
        let hand = &mut self.players[player].hand;
        if index >= hand.len() {
            return Undoable::unchanged(None);
        }
        let replaced = hand.set(index, card);
        Undoable::new(
            Some(replaced),
            UndoAction::new(move |world: &mut World| {
                world.players[player].hand.set(index, replaced);
            }),
        )
    }

    /// Index of a uniformly chosen hand card matching `filter`.
    ///
    /// Consumes one random draw when at least one card matches.
    pub fn random_hand_index(
        &mut self,
        player: PlayerId,
        filter: impl Fn(&Card) -> bool,
    ) -> Option<usize> {
        let candidates: Vec<usize> = self.players[player]
            .hand
            .iter()
            .enumerate()
            .filter(|(_, id)| self.cards.get(*id).is_some_and(&filter))
            .map(|(index, _)| index)
            .collect();
        let pick = self.rng().pick_index(candidates.len())?;
        Some(candidates[pick])
    }

    /// Shuffle a card into its owner's deck at a uniform position.
    pub fn put_to_random_deck_position(&mut self, card: EntityId) -> Result<UndoAction> {
        let owner = self.require_card(card)?.owner();
        let len = self.players[owner].deck.len();
        let max = i32::try_from(len).unwrap_or(i32::MAX);
        let index = usize::try_from(self.rng().roll(0, max)).map_or(0, |i| i.min(len));
        self.players[owner].deck.insert(index, card);
        Ok(UndoAction::new(move |world: &mut World| {
            let removed = world.players[owner].deck.remove(index);
            debug_assert_eq!(removed, card);
        }))
    }

    /// Put a card on top of its owner's deck.
    pub fn put_on_top_of_deck(&mut self, card: EntityId) -> Result<UndoAction> {
        let owner = self.require_card(card)?.owner();
        self.players[owner].deck.push_back(card);
        Ok(UndoAction::new(move |world: &mut World| {
            world.players[owner].deck.pop_back();
        }))
    }

    /// Move the top card of `player`'s deck into their hand.
    ///
    /// With a full hand the drawn card is destroyed.
    pub fn draw_card(&mut self, player: PlayerId) -> Result<Undoable<Option<EntityId>>> {
        let Some(card) = self.players[player].deck.pop_back() else {
            return Ok(Undoable::unchanged(None));
        };
        let mut undo = UndoBuilder::new();
        undo.add(UndoAction::new(move |world: &mut World| {
            world.players[player].deck.push_back(card);
        }));

        let added = self.add_card_to_hand(card)?;
        if added.is_noop() {
            undo.add(self.destroy_card(card));
            self.log.normal("hand", format!("{player} burns {card}"));
            return Ok(Undoable::new(None, undo.build()));
        }
        undo.add(added);
        Ok(Undoable::new(Some(card), undo.build()))
    }

    /// Set a player's available mana.
    pub fn set_mana(&mut self, player: PlayerId, mana: i32) -> UndoAction {
        let previous = std::mem::replace(&mut self.players[player].mana, mana);
        if previous == mana {
            return UndoAction::noop();
        }
        UndoAction::new(move |world: &mut World| world.players[player].mana = previous)
    }
}
