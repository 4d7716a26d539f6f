//! Undo integration tests.
//!
//! Every action must be exactly reversible: running an action and then its
//! undo leaves the world observably unchanged.

mod common;

use brazier_core::actions::{
    guard, sequence, Ability, AbilityTrigger, Condition, DeathrattleAction, MinionAction, WorldAction,
};
use brazier_core::cards::CardId;
use brazier_core::core::{EntityId, GameRng, RandomProvider, World, WorldConfig};
use brazier_core::undo::UndoAction;
use common::*;
use proptest::prelude::*;

fn populated_world() -> (World, Vec<EntityId>) {
    let mut world = world();
    let minions = vec![
        summon(&mut world, P0, WISP),
        summon(&mut world, P0, YETI),
        summon(&mut world, P0, SHIELDBEARER),
        summon(&mut world, P1, YETI),
    ];
    give_card(&mut world, P0, TIDEHUNTER);
    give_card(&mut world, P0, MOONFIRE);
    (world, minions)
}

fn catalog() -> Vec<MinionAction> {
    vec![
        MinionAction::buff(2, 1),
        MinionAction::BuffAttackRange { min: 1, max: 4 },
        MinionAction::SetAttack(7),
        MinionAction::SetHealth(2),
        MinionAction::SetMaxHealth(9),
        MinionAction::DoubleAttack,
        MinionAction::Taunt,
        MinionAction::DivineShield,
        MinionAction::ImmuneThisTurn,
        MinionAction::DamageSelf(3),
        MinionAction::RestoreSelfHealth,
        MinionAction::DamageOpponentHero(2),
        MinionAction::buff_neighbours(MinionAction::buff(1, 1)),
        MinionAction::SummonLeft(RECRUIT),
        MinionAction::SummonRight(WISP),
        MinionAction::ResummonWithHealth(1),
        MinionAction::ReturnToHand { cost_reduction: 2 },
        MinionAction::ShuffleIntoDeck,
        MinionAction::TransformInto(vec![WISP, YETI]),
        MinionAction::SwapWithMinionInHand,
        MinionAction::SummonCopyForOpponent,
        MinionAction::SelfDestruct,
        MinionAction::atomic(MinionAction::DamageOwnHero(1)),
        MinionAction::AddAbility(Ability::new(AbilityTrigger::DamageTaken, MinionAction::buff(1, 0))),
        MinionAction::AbilityThisTurn(Ability::new(
            AbilityTrigger::FriendlyMinionSummoned,
            MinionAction::buff(0, 1),
        )),
        MinionAction::AddDeathrattle(DeathrattleAction::Summon(RECRUIT)),
        MinionAction::Reincarnate(Box::new(MinionAction::Taunt)),
    ]
}

#[test]
fn test_sequence_undo_equals_reverse_undo() {
    let steps = [
        MinionAction::buff(1, 1),
        MinionAction::SummonRight(RECRUIT),
        MinionAction::DoubleAttack,
    ];

    // Combined.
    let (mut combined, minions) = populated_world();
    let before = snapshot(&combined);
    let undo = sequence(&mut combined, &steps, minions[1]).unwrap();
    let after = snapshot(&combined);
    undo.undo(&mut combined);
    assert_eq!(snapshot(&combined), before);

    // Individually, undone c, b, a.
    let (mut separate, minions) = populated_world();
    let undos: Vec<UndoAction> = steps
        .iter()
        .map(|step| step.alter_world(&mut separate, minions[1]).unwrap())
        .collect();
    assert_eq!(snapshot(&separate), after);
    for undo in undos.into_iter().rev() {
        undo.undo(&mut separate);
    }
    assert_eq!(snapshot(&separate), before);
}

#[test]
fn test_guard_false_changes_nothing() {
    let (mut world, minions) = populated_world();
    let before = snapshot(&world);

    let action = MinionAction::sequence([
        MinionAction::SummonRight(YETI),
        MinionAction::DamageOpponentHero(5),
    ]);
    let undo = guard(&mut world, false, &action, minions[0]).unwrap();

    assert!(undo.is_noop());
    assert_eq!(snapshot(&world), before);
}

#[test]
fn test_condition_guard_short_circuits() {
    let (mut world, minions) = populated_world();
    let before = snapshot(&world);

    let action = MinionAction::guard(Condition::AttackAtLeast(10), MinionAction::SelfDestruct);
    let undo = action.alter_world(&mut world, minions[1]).unwrap();

    assert!(undo.is_noop());
    assert_eq!(snapshot(&world), before);
}

#[test]
fn test_actions_on_dead_minion_are_noops() {
    let (mut world, minions) = populated_world();
    let _ = world.kill_minion(minions[0]).unwrap();
    let before = snapshot(&world);

    for action in catalog() {
        let undo = action.alter_world(&mut world, minions[0]).unwrap();
        assert!(undo.is_noop(), "{action:?} acted on a dead minion");
    }
    assert_eq!(snapshot(&world), before);
}

#[test]
fn test_unknown_minion_is_noop() {
    let (mut world, _) = populated_world();
    let undo = MinionAction::buff(1, 1)
        .alter_world(&mut world, EntityId(9999))
        .unwrap();
    assert!(undo.is_noop());
}

#[test]
fn test_every_catalog_action_is_reversible() {
    for action in catalog() {
        let (mut world, minions) = populated_world();
        let before = snapshot(&world);

        let undo = action.alter_world(&mut world, minions[0]).unwrap();
        undo.undo(&mut world);

        assert_eq!(snapshot(&world), before, "{action:?} did not undo cleanly");
    }
}

#[test]
fn test_return_to_hand_undo_restores_board_slot() {
    let (mut world, minions) = populated_world();
    let undo = MinionAction::ReturnToHand { cost_reduction: 2 }
        .alter_world(&mut world, minions[1])
        .unwrap();

    assert_eq!(board(&world, P0), vec![minions[0], minions[2]]);
    let returned = *world.player(P0).hand.last().unwrap();
    let card = world.card(returned).unwrap();
    assert_eq!(card.card_id(), YETI);
    assert_eq!(card.active_mana_cost(), 2);

    undo.undo(&mut world);
    assert_eq!(board(&world, P0), minions[..3].to_vec());
    assert!(world.card(returned).is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_action_chains_undo_to_start(
        steps in prop::collection::vec((0usize..27, 0usize..4), 1..12),
        seed in any::<u64>(),
    ) {
        let catalog = catalog();
        let mut world = World::with_seed(Default::default(), registry(), seed);
        let minions = vec![
            summon(&mut world, P0, WISP),
            summon(&mut world, P0, YETI),
            summon(&mut world, P0, SHIELDBEARER),
            summon(&mut world, P1, YETI),
        ];
        give_card(&mut world, P0, TIDEHUNTER);
        let before = snapshot(&world);

        let mut undos = Vec::new();
        for (action, minion) in steps {
            undos.push(catalog[action % catalog.len()].alter_world(&mut world, minions[minion]).unwrap());
        }
        for undo in undos.into_iter().rev() {
            undo.undo(&mut world);
        }

        prop_assert_eq!(snapshot(&world), before);
    }

    #[test]
    fn prop_seeded_randomness_is_replayable(seed in any::<u64>(), warmup in 0usize..8) {
        let run = |rng: GameRng| {
            let mut world = World::new(WorldConfig::default(), registry(), Box::new(rng));
            let minion = summon(&mut world, P0, WISP);
            let _ = MinionAction::BuffAttackRange { min: 0, max: 10 }
                .alter_world(&mut world, minion)
                .unwrap();
            let _ = MinionAction::TransformInto(vec![WISP, YETI, CardId::new(4)])
                .alter_world(&mut world, minion)
                .unwrap();
            snapshot(&world)
        };
        prop_assert_eq!(run(GameRng::new(seed)), run(GameRng::new(seed)));

        // A stream resumed from a captured state replays the original.
        let mut rng = GameRng::new(seed);
        for _ in 0..warmup {
            rng.roll(0, 100);
        }
        let resumed = GameRng::from_state(&rng.state());
        prop_assert_eq!(run(resumed), run(rng.clone()));

        // Forks of identical streams agree.
        prop_assert_eq!(run(rng.clone().fork()), run(rng.fork()));
    }
}
