//! Triggered abilities and deathrattles.

mod common;

use std::sync::Arc;

use brazier_core::actions::{Ability, AbilityTrigger, DeathrattleAction, MinionAction, WorldAction};
use brazier_core::board::MinionFlag;
use brazier_core::cards::{CardId, CardRegistry};
use brazier_core::core::{CharacterRef, EntityId, SessionExpiry, World, WorldConfig};
use brazier_core::damage::DamageSource;
use brazier_core::events::EventKind;
use common::*;

fn deathrattle(world: &mut World, minion: EntityId, action: DeathrattleAction) {
    let added = MinionAction::AddDeathrattle(action)
        .alter_world(world, minion)
        .unwrap();
    assert!(!added.is_noop());
}

#[test]
fn test_deathrattle_summons_into_vacated_slot() {
    let mut world = world();
    let wisp = summon(&mut world, P0, WISP);
    let yeti = summon(&mut world, P0, YETI);
    let bearer = summon(&mut world, P0, SHIELDBEARER);
    deathrattle(&mut world, yeti, DeathrattleAction::Summon(RECRUIT));
    let before = snapshot(&world);

    let dealt = world
        .deal_damage(DamageSource::Hero(P1), 5, CharacterRef::Minion(yeti))
        .unwrap();

    let layout = board(&world, P0);
    assert_eq!(layout.len(), 3);
    assert_eq!((layout[0], layout[2]), (wisp, bearer));
    assert_eq!(world.minion(layout[1]).unwrap().name(), "Silver Hand Recruit");

    dealt.into_undo().undo(&mut world);
    assert_eq!(snapshot(&world), before);
}

#[test]
fn test_deathrattle_ignores_other_deaths() {
    let mut world = world();
    let wisp = summon(&mut world, P0, WISP);
    let yeti = summon(&mut world, P0, YETI);
    deathrattle(&mut world, yeti, DeathrattleAction::Summon(RECRUIT));

    let _ = world.kill_minion(wisp).unwrap();
    assert_eq!(board(&world, P0), vec![yeti]);
}

#[test]
fn test_undoing_deathrattle_grant_detaches_it() {
    let mut world = world();
    let yeti = summon(&mut world, P0, YETI);
    let listeners = world.events().listener_count(EventKind::MinionDied);

    let added = MinionAction::AddDeathrattle(DeathrattleAction::Summon(RECRUIT))
        .alter_world(&mut world, yeti)
        .unwrap();
    assert_eq!(world.events().listener_count(EventKind::MinionDied), listeners + 1);
    added.undo(&mut world);

    let _ = world.kill_minion(yeti).unwrap();
    assert!(board(&world, P0).is_empty());
}

#[test]
fn test_deathrattle_buffs_survivors_and_hits_hero() {
    let mut world = world();
    let wisp = summon(&mut world, P0, WISP);
    let yeti = summon(&mut world, P0, YETI);
    deathrattle(
        &mut world,
        wisp,
        DeathrattleAction::Sequence(vec![
            DeathrattleAction::for_each_friendly(MinionAction::buff(1, 1)),
            DeathrattleAction::DamageOpponentHero(2),
        ]),
    );

    let _ = world.kill_minion(wisp).unwrap();

    assert_eq!(world.minion(yeti).unwrap().attack(), 5);
    assert_eq!(world.minion(yeti).unwrap().max_health(), 6);
    assert_eq!(world.player(P1).hero.health, 28);
}

#[test]
fn test_resummon_deathrattle_returns_fresh_copy() {
    let mut world = world();
    let yeti = summon(&mut world, P0, YETI);
    let _ = MinionAction::buff(3, 0).alter_world(&mut world, yeti).unwrap();
    deathrattle(&mut world, yeti, DeathrattleAction::Resummon);

    let _ = world.kill_minion(yeti).unwrap();

    let layout = board(&world, P0);
    assert_eq!(layout.len(), 1);
    assert_ne!(layout[0], yeti);
    assert_eq!(world.minion(layout[0]).unwrap().attack(), 4);
}

#[test]
fn test_damage_taken_ability() {
    let mut world = world();
    let yeti = summon(&mut world, P0, YETI);
    let ability = Ability::new(AbilityTrigger::DamageTaken, MinionAction::buff(1, 0));
    let _ = MinionAction::AddAbility(ability).alter_world(&mut world, yeti).unwrap();

    let _ = world
        .deal_damage(DamageSource::Hero(P1), 1, CharacterRef::Minion(yeti))
        .unwrap();
    let _ = world
        .deal_damage(DamageSource::Hero(P1), 1, CharacterRef::Hero(P0))
        .unwrap();

    assert_eq!(world.minion(yeti).unwrap().attack(), 5);
}

#[test]
fn test_ability_of_dead_minion_stays_quiet() {
    let mut world = world();
    let wisp = summon(&mut world, P0, WISP);
    let yeti = summon(&mut world, P0, YETI);
    let ability = Ability::new(AbilityTrigger::FriendlyMinionSummoned, MinionAction::buff(1, 0));
    let _ = MinionAction::AddAbility(ability).alter_world(&mut world, wisp).unwrap();
    let _ = world.kill_minion(wisp).unwrap();

    summon(&mut world, P0, RECRUIT);
    assert_eq!(world.minion(wisp).unwrap().attack(), 1);
    assert_eq!(world.minion(yeti).unwrap().attack(), 4);
}

#[test]
fn test_ability_this_turn_expires_with_session() {
    let mut world = world();
    let wisp = summon(&mut world, P0, WISP);
    let ability = Ability::new(AbilityTrigger::FriendlyCardPlayed, MinionAction::buff(1, 0));
    let _ = MinionAction::AbilityThisTurn(ability)
        .alter_world(&mut world, wisp)
        .unwrap();
    assert_eq!(world.events().session_listener_count(), 1);

    give_card(&mut world, P0, MOONFIRE);
    let _ = world.play_card(P0, 0, Some(CharacterRef::Hero(P1))).unwrap();
    assert_eq!(world.minion(wisp).unwrap().attack(), 2);

    let expired = world.expire_session_modifiers();
    assert_eq!(world.events().session_listener_count(), 0);
    give_card(&mut world, P0, MOONFIRE);
    let _ = world.play_card(P0, 0, Some(CharacterRef::Hero(P1))).unwrap();
    assert_eq!(world.minion(wisp).unwrap().attack(), 2);

    expired.undo(&mut world);
    assert_eq!(world.events().session_listener_count(), 1);
}

#[test]
fn test_ability_this_turn_ends_with_outermost_atomic_scope() {
    let config = WorldConfig::default().with_session_expiry(SessionExpiry::OnOutermostAtomicExit);
    let mut world = world_with(config);
    let wisp = summon(&mut world, P0, WISP);
    let ability = Ability::new(AbilityTrigger::FriendlyCardPlayed, MinionAction::buff(1, 0));
    let _ = MinionAction::AbilityThisTurn(ability)
        .alter_world(&mut world, wisp)
        .unwrap();

    give_card(&mut world, P0, MOONFIRE);
    let played = world.play_card(P0, 0, Some(CharacterRef::Hero(P1))).unwrap();

    assert_eq!(world.minion(wisp).unwrap().attack(), 2);
    assert_eq!(world.events().session_listener_count(), 0);

    played.undo(&mut world);
    assert_eq!(world.minion(wisp).unwrap().attack(), 1);
    assert_eq!(world.events().session_listener_count(), 1);
}

#[test]
fn test_reincarnate_returns_fresh_copy_at_end() {
    let mut world = world();
    let yeti = summon(&mut world, P0, YETI);
    let wisp = summon(&mut world, P0, WISP);
    let _ = world
        .deal_damage(DamageSource::Hero(P1), 3, CharacterRef::Minion(yeti))
        .unwrap();
    let before = snapshot(&world);

    let undo = MinionAction::Reincarnate(Box::new(MinionAction::Taunt))
        .alter_world(&mut world, yeti)
        .unwrap();

    assert!(world.minion(yeti).unwrap().is_dead());
    let layout = board(&world, P0);
    assert_eq!(layout.len(), 2);
    assert_eq!(layout[0], wisp);
    let reborn = world.minion(layout[1]).unwrap();
    assert_eq!(reborn.name(), "Chillwind Yeti");
    assert_eq!(reborn.health(), 5);
    assert!(reborn.has(MinionFlag::Taunt));

    undo.undo(&mut world);
    assert_eq!(snapshot(&world), before);
}

#[test]
fn test_json_authored_deathrattle() {
    let json = r#"[
        { "id": 1, "name": "Wisp", "card_type": "Minion", "mana_cost": 0,
          "minion": { "attack": 1, "health": 1 } },
        { "id": 2, "name": "Harvest Golem", "card_type": "Minion", "mana_cost": 3,
          "minion": { "attack": 2, "health": 3,
                      "battlecry": { "AddDeathrattle": { "Summon": 1 } } } }
    ]"#;
    let registry = Arc::new(CardRegistry::from_json(json).unwrap());
    let mut world = World::with_seed(WorldConfig::default(), registry, 5);

    give_card(&mut world, P0, CardId::new(2));
    let _ = world.play_card(P0, 0, None).unwrap();
    let golem = board(&world, P0)[0];
    let _ = world
        .deal_damage(DamageSource::Hero(P1), 3, CharacterRef::Minion(golem))
        .unwrap();

    let layout = board(&world, P0);
    assert_eq!(layout.len(), 1);
    assert_eq!(world.minion(layout[0]).unwrap().name(), "Wisp");
}

#[test]
fn test_json_deathrattle_with_unknown_card_is_rejected() {
    let json = r#"[
        { "id": 2, "name": "Broken Golem", "card_type": "Minion", "mana_cost": 3,
          "minion": { "attack": 2, "health": 3,
                      "battlecry": { "AddDeathrattle": { "Summon": 77 } } } }
    ]"#;
    assert!(CardRegistry::from_json(json).is_err());
}
