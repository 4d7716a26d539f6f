//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use brazier_core::actions::{CardPlayAction, MinionAction, TargetAction};
use brazier_core::board::{Hero, MinionFlag};
use brazier_core::cards::{CardDefinition, CardId, CardRegistry, Keyword};
use brazier_core::core::{EntityId, PlayerId, World, WorldConfig};
use brazier_core::events::EventKind;

pub const WISP: CardId = CardId::new(1);
pub const YETI: CardId = CardId::new(2);
pub const FIREBALL: CardId = CardId::new(3);
pub const SHIELDBEARER: CardId = CardId::new(4);
pub const ARGUS: CardId = CardId::new(5);
pub const SHIELD_BLOCK: CardId = CardId::new(6);
pub const MOONFIRE: CardId = CardId::new(7);
pub const RECRUIT: CardId = CardId::new(8);
pub const TIDEHUNTER: CardId = CardId::new(9);

pub const P0: PlayerId = PlayerId(0);
pub const P1: PlayerId = PlayerId(1);

pub fn registry() -> Arc<CardRegistry> {
    let cards = [
        CardDefinition::minion(WISP, "Wisp", 0, 1, 1),
        CardDefinition::minion(YETI, "Chillwind Yeti", 4, 4, 5),
        CardDefinition::spell(FIREBALL, "Fireball", 4)
            .with_on_play(CardPlayAction::OnTarget(TargetAction::Damage(6))),
        CardDefinition::minion(SHIELDBEARER, "Shieldbearer", 1, 0, 4).with_keyword(Keyword::Taunt),
        CardDefinition::minion(ARGUS, "Defender of Argus", 4, 2, 3).with_battlecry(
            MinionAction::buff_neighbours(MinionAction::sequence([
                MinionAction::buff(1, 1),
                MinionAction::Taunt,
            ])),
        ),
        CardDefinition::spell(SHIELD_BLOCK, "Shield Block", 3)
            .with_on_play(CardPlayAction::GainArmor(5)),
        CardDefinition::spell(MOONFIRE, "Moonfire", 0)
            .with_on_play(CardPlayAction::OnTarget(TargetAction::Damage(1))),
        CardDefinition::minion(RECRUIT, "Silver Hand Recruit", 1, 1, 1),
        CardDefinition::minion(TIDEHUNTER, "Murloc Tidehunter", 2, 2, 1)
            .with_keyword(Keyword::Murloc)
            .with_battlecry(MinionAction::SummonRight(RECRUIT)),
    ];

    let mut registry = CardRegistry::new();
    for card in cards {
        registry.register(card).unwrap();
    }
    registry.validate().unwrap();
    Arc::new(registry)
}

pub fn world() -> World {
    world_with(WorldConfig::default())
}

pub fn world_with(config: WorldConfig) -> World {
    World::with_seed(config, registry(), 42)
}

/// Summon a minion at the end of `player`'s board.
pub fn summon(world: &mut World, player: PlayerId, card: CardId) -> EntityId {
    let template = world.registry().minion_of(card).unwrap();
    let end = world.player(player).board.len();
    let summoned = world.summon(player, template, end).unwrap();
    summoned.result().unwrap()
}

/// Create a card and put it in its owner's hand.
pub fn give_card(world: &mut World, player: PlayerId, card: CardId) -> EntityId {
    let id = *world.create_card(player, card).unwrap().result();
    let added = world.add_card_to_hand(id).unwrap();
    assert!(!added.is_noop(), "hand is full");
    id
}

pub fn board(world: &World, player: PlayerId) -> Vec<EntityId> {
    world.player(player).board.iter().copied().collect()
}

/// Everything observable about a world, for before/after comparisons.
#[derive(Debug, PartialEq)]
pub struct Snapshot {
    players: Vec<PlayerSnapshot>,
    minions: Vec<MinionSnapshot>,
    cards: Vec<(EntityId, i32, Option<EntityId>)>,
    history: usize,
    listeners: Vec<usize>,
}

#[derive(Debug, PartialEq)]
struct PlayerSnapshot {
    hero: Hero,
    hand: Vec<EntityId>,
    deck: Vec<EntityId>,
    board: Vec<EntityId>,
    mana: i32,
    spell_damage: i32,
    cards_played: u32,
}

#[derive(Debug, PartialEq)]
struct MinionSnapshot {
    id: EntityId,
    owner: PlayerId,
    name: String,
    attack: i32,
    health: i32,
    max_health: i32,
    flags: Vec<bool>,
    dead: bool,
}

pub fn snapshot(world: &World) -> Snapshot {
    let players = PlayerId::all(world.player_count())
        .map(|player| {
            let state = world.player(player);
            PlayerSnapshot {
                hero: state.hero,
                hand: state.hand.iter().copied().collect(),
                deck: state.deck.iter().copied().collect(),
                board: state.board.iter().copied().collect(),
                mana: state.mana,
                spell_damage: state.spell_damage.value(),
                cards_played: state.cards_played_this_turn,
            }
        })
        .collect();

    let minions = world
        .minions()
        .map(|m| MinionSnapshot {
            id: m.id(),
            owner: m.owner(),
            name: m.name().to_string(),
            attack: m.attack(),
            health: m.health(),
            max_health: m.max_health(),
            flags: [
                MinionFlag::Taunt,
                MinionFlag::Stealth,
                MinionFlag::DivineShield,
                MinionFlag::Charge,
                MinionFlag::Immune,
            ]
            .into_iter()
            .map(|flag| m.has(flag))
            .collect(),
            dead: m.is_dead(),
        })
        .collect();

    let cards = world
        .cards()
        .map(|c| (c.id(), c.raw_mana_cost().value(), c.minion()))
        .collect();

    Snapshot {
        players,
        minions,
        cards,
        history: world.events().history().len(),
        listeners: [
            EventKind::CardPlayed,
            EventKind::ArmorGained,
            EventKind::DamageDealt,
            EventKind::MinionSummoned,
            EventKind::MinionDied,
        ]
        .into_iter()
        .map(|kind| world.events().listener_count(kind))
        .collect(),
    }
}
