//! Round-based battle resolution shared by dungeons and the arena.

use rand::Rng;
use rand::prelude::IteratorRandom;

use crate::constants::MAX_BATTLE_ROUNDS;

/// A combatant snapshot. Built from character stats (plus companion
/// bonuses) or from enemy master data; never written back directly.
#[derive(Debug, Clone)]
pub struct BattleUnit {
    pub name: String,
    pub attack: i32,
    pub defense: i32,
    pub max_hp: i32,
    pub current_hp: i32,
}

impl BattleUnit {
    pub fn new(name: impl Into<String>, attack: i32, defense: i32, hp: i32) -> Self {
        BattleUnit {
            name: name.into(),
            attack,
            defense,
            max_hp: hp,
            current_hp: hp,
        }
    }

    fn is_alive(&self) -> bool {
        self.current_hp > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    AttackerVictory,
    DefenderVictory,
    /// Neither side fell within the round cap; counts as a defender win
    /// so a stalling attacker never profits.
    Stalemate,
}

/// Full record of a resolved battle, kept for the client's combat log.
#[derive(Debug)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub rounds: u32,
    pub log: Vec<String>,
}

impl BattleReport {
    pub fn attacker_won(&self) -> bool {
        self.outcome == BattleOutcome::AttackerVictory
    }
}

/// Resolves a battle to completion. Attackers strike first each round;
/// each living unit attacks one random living opponent.
pub fn resolve_battle<R: Rng>(
    mut attackers: Vec<BattleUnit>,
    mut defenders: Vec<BattleUnit>,
    rng: &mut R,
) -> BattleReport {
    let mut log = Vec::new();
    let mut rounds = 0;

    while rounds < MAX_BATTLE_ROUNDS {
        rounds += 1;

        process_side_attack(&attackers, &mut defenders, &mut log, rng);
        if !defenders.iter().any(BattleUnit::is_alive) {
            return BattleReport {
                outcome: BattleOutcome::AttackerVictory,
                rounds,
                log,
            };
        }

        process_side_attack(&defenders, &mut attackers, &mut log, rng);
        if !attackers.iter().any(BattleUnit::is_alive) {
            return BattleReport {
                outcome: BattleOutcome::DefenderVictory,
                rounds,
                log,
            };
        }
    }

    log.push("The fight drags on too long and is called off.".to_string());
    BattleReport {
        outcome: BattleOutcome::Stalemate,
        rounds,
        log,
    }
}

fn process_side_attack<R: Rng>(
    attacking: &[BattleUnit],
    defending: &mut [BattleUnit],
    log: &mut Vec<String>,
    rng: &mut R,
) {
    for attacker in attacking.iter().filter(|u| u.is_alive()) {
        // Pick a random living target; the side may already be wiped out
        // mid-round.
        let Some(target_idx) = defending
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_alive())
            .map(|(i, _)| i)
            .choose(rng)
        else {
            return;
        };

        let defender = &mut defending[target_idx];
        let damage = (attacker.attack - defender.defense).max(1);
        defender.current_hp = (defender.current_hp - damage).max(0);
        log.push(format!(
            "{} hits {} for {} damage.",
            attacker.name, defender.name, damage
        ));
        if !defender.is_alive() {
            log.push(format!("{} is defeated!", defender.name));
        }
    }
}
