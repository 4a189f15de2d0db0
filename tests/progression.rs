use chrono::{Duration, Utc};

use aldoria_server::database::models::Character;
use aldoria_server::game::energy::calculate_energy_recharge;
use aldoria_server::game::leveling::{handle_character_leveling, xp_for_level};

fn test_character(energy: i32, max_energy: i32, minutes_since_update: i64) -> Character {
    Character {
        character_id: 1,
        name: "Tester".into(),
        class: "warrior".into(),
        gold: 100,
        experience: 0,
        level: 1,
        energy,
        max_energy,
        last_energy_update: Utc::now() - Duration::minutes(minutes_since_update),
        attack: 10,
        defense: 5,
        health: 100,
        arena_rating: 1000,
        equipped_clothing_id: None,
        last_seen_at: Utc::now(),
        created_at: Utc::now(),
    }
}

#[test]
fn energy_no_change_before_interval() {
    let character = test_character(5, 20, 3);
    let (energy, update) = calculate_energy_recharge(&character);
    assert_eq!(energy, 5);
    assert!(!update);
}

#[test]
fn energy_recharges_one_point_per_interval() {
    let character = test_character(5, 20, 35);
    let (energy, update) = calculate_energy_recharge(&character);
    assert_eq!(energy, 8); // 3 intervals of 10 minutes
    assert!(update);
}

#[test]
fn energy_caps_at_maximum() {
    let character = test_character(18, 20, 600);
    let (energy, update) = calculate_energy_recharge(&character);
    assert_eq!(energy, 20);
    assert!(update);
}

#[test]
fn energy_over_cap_is_left_alone() {
    // A tonic can push past max; regen must not clamp it back down.
    let character = test_character(25, 20, 600);
    let (energy, update) = calculate_energy_recharge(&character);
    assert_eq!(energy, 25);
    assert!(!update);
}

#[test]
fn xp_curve_is_monotonic() {
    for level in 1..50 {
        assert!(xp_for_level(level + 1) > xp_for_level(level));
    }
}

#[test]
fn leveling_carries_overflow_across_multiple_levels() {
    let result = handle_character_leveling(1, 0, 1000);
    assert!(result.did_level_up);
    assert!(result.new_level > 2);
    assert!(result.new_xp < xp_for_level(result.new_level));
    assert!(result.stat_gains.0 >= 2);
    assert!(result.stat_gains.2 >= 10);
}

#[test]
fn leveling_without_enough_xp_changes_nothing() {
    let result = handle_character_leveling(1, 0, 10);
    assert!(!result.did_level_up);
    assert_eq!(result.new_level, 1);
    assert_eq!(result.new_xp, 10);
    assert_eq!(result.stat_gains, (0, 0, 0));
}
