//! Playing a card from hand.

use super::card_play::CardPlayArg;
use super::combinators::{transaction, WorldAction};
use crate::core::entity::CharacterRef;
use crate::core::player::PlayerId;
use crate::core::World;
use crate::error::Result;
use crate::events::DomainEvent;
use crate::undo::UndoAction;

impl World {
    /// Play the card at `hand_index` of `player`'s hand.
    ///
    /// Does nothing when there is no such card, the player cannot pay for
    /// it, or a minion card meets a full board. Otherwise, as one atomic
    /// unit: the card leaves the hand, mana is spent, `CardPlayed` is
    /// published, a minion card's minion enters the board and runs its
    /// battlecry, and the card's play actions run.
    pub fn play_card(
        &mut self,
        player: PlayerId,
        hand_index: usize,
        target: Option<CharacterRef>,
    ) -> Result<UndoAction> {
        let Some(&card) = self.player(player).hand.get(hand_index) else {
            return Ok(UndoAction::noop());
        };
        let card_state = self.require_card(card)?;
        let cost = card_state.active_mana_cost();
        let minion = card_state.minion();
        let definition = card_state.definition().clone();

        if self.player(player).mana < cost || (minion.is_some() && self.is_board_full(player)) {
            return Ok(UndoAction::noop());
        }
        self.log
            .normal("play", format!("{player} plays {} ({card}) for {cost}", definition.name));

        self.do_atomic(|world| {
            transaction(world, |world, undo| {
                undo.add_result(world.remove_from_hand(player, hand_index));
                let mana = world.player(player).mana;
                undo.add(world.set_mana(player, mana - cost));
                undo.add(world.record_card_played(player));
                undo.add(world.publish(DomainEvent::CardPlayed {
                    card,
                    owner: player,
                    mana_cost_paid: cost,
                })?);

                if let Some(minion) = minion {
                    let end = world.player(player).board.len();
                    undo.add(world.place_on_board(minion, end)?);
                    let battlecry = definition.minion.as_ref().and_then(|m| m.battlecry.as_ref());
                    if let Some(battlecry) = battlecry {
                        undo.add(battlecry.alter_world(world, minion)?);
                    }
                }

                let arg = CardPlayArg { card, player, target };
                for action in &definition.on_play {
                    undo.add(action.alter_world(world, arg)?);
                }
                Ok(())
            })
        })
    }

    fn record_card_played(&mut self, player: PlayerId) -> UndoAction {
        self.player_mut(player).cards_played_this_turn += 1;
        UndoAction::new(move |world: &mut World| {
            world.player_mut(player).cards_played_this_turn -= 1;
        })
    }
}
