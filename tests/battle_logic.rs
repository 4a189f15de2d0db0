use rand::SeedableRng;
use rand::rngs::StdRng;

use aldoria_server::game::battle::{BattleOutcome, BattleUnit, resolve_battle};

#[test]
fn overwhelming_attacker_wins() {
    let mut rng = StdRng::seed_from_u64(11);
    let report = resolve_battle(
        vec![BattleUnit::new("Hero", 100, 10, 200)],
        vec![BattleUnit::new("Rat", 2, 0, 10)],
        &mut rng,
    );
    assert_eq!(report.outcome, BattleOutcome::AttackerVictory);
    assert!(report.attacker_won());
    assert_eq!(report.rounds, 1);
}

#[test]
fn overwhelming_defender_wins() {
    let mut rng = StdRng::seed_from_u64(11);
    let report = resolve_battle(
        vec![BattleUnit::new("Rat", 2, 0, 10)],
        vec![BattleUnit::new("Dragon", 200, 50, 500)],
        &mut rng,
    );
    assert_eq!(report.outcome, BattleOutcome::DefenderVictory);
    assert!(!report.attacker_won());
}

#[test]
fn damage_never_drops_below_one() {
    // Defense far above attack: the fight still ends because every hit
    // chips at least 1 HP.
    let mut rng = StdRng::seed_from_u64(5);
    let report = resolve_battle(
        vec![BattleUnit::new("Squire", 5, 100, 25)],
        vec![BattleUnit::new("Turtle", 5, 100, 20)],
        &mut rng,
    );
    assert_ne!(report.outcome, BattleOutcome::Stalemate);
}

#[test]
fn round_cap_produces_stalemate() {
    let mut rng = StdRng::seed_from_u64(5);
    let report = resolve_battle(
        vec![BattleUnit::new("Wall", 1, 1000, 10_000)],
        vec![BattleUnit::new("Other Wall", 1, 1000, 10_000)],
        &mut rng,
    );
    assert_eq!(report.outcome, BattleOutcome::Stalemate);
    // A stalemate never counts as an attacker win.
    assert!(!report.attacker_won());
}

#[test]
fn party_members_all_fight() {
    // Two attackers against one enemy should finish at least as fast as
    // one attacker alone.
    let solo_rounds = {
        let mut rng = StdRng::seed_from_u64(21);
        resolve_battle(
            vec![BattleUnit::new("Hero", 20, 5, 100)],
            vec![BattleUnit::new("Golem", 1, 10, 100)],
            &mut rng,
        )
        .rounds
    };
    let duo_rounds = {
        let mut rng = StdRng::seed_from_u64(21);
        resolve_battle(
            vec![
                BattleUnit::new("Hero", 20, 5, 100),
                BattleUnit::new("Wolf", 20, 5, 50),
            ],
            vec![BattleUnit::new("Golem", 1, 10, 100)],
            &mut rng,
        )
        .rounds
    };
    assert!(duo_rounds <= solo_rounds);
}
