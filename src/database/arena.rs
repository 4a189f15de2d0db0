//! Contains all database functions related to the arena: NPC fights,
//! PvP matches, ratings, and match history.

use sqlx::{PgPool, Postgres, Transaction};

use super::economy::add_materials;
use super::models::{ArenaMatch, Character};
use crate::constants::ARENA_RATING_K;
use crate::game::battle::{BattleUnit, resolve_battle};
use crate::loot::{ActivityKind, Difficulty, MaterialDrop, roll_material_drops};

/// A fixed ladder of NPC gladiators. The fight is offered from the
/// highest tier whose rating floor the character has reached.
struct NpcOpponent {
    name: &'static str,
    attack: i32,
    defense: i32,
    health: i32,
    rating_floor: i32,
    difficulty: Difficulty,
}

const NPC_LADDER: [NpcOpponent; 4] = [
    NpcOpponent {
        name: "Training Dummy Sergeant",
        attack: 8,
        defense: 2,
        health: 60,
        rating_floor: 0,
        difficulty: Difficulty::Easy,
    },
    NpcOpponent {
        name: "Pit Brawler Edda",
        attack: 18,
        defense: 8,
        health: 120,
        rating_floor: 1100,
        difficulty: Difficulty::Medium,
    },
    NpcOpponent {
        name: "Bladedancer Corvus",
        attack: 28,
        defense: 12,
        health: 180,
        rating_floor: 1300,
        difficulty: Difficulty::Hard,
    },
    NpcOpponent {
        name: "Grand Champion Vael",
        attack: 40,
        defense: 18,
        health: 280,
        rating_floor: 1600,
        difficulty: Difficulty::Boss,
    },
];

fn ladder_opponent(rating: i32) -> &'static NpcOpponent {
    NPC_LADDER
        .iter()
        .rev()
        .find(|npc| rating >= npc.rating_floor)
        .unwrap_or(&NPC_LADDER[0])
}

/// PvP loot difficulty scales with the beaten opponent's rating.
fn pvp_difficulty(opponent_rating: i32) -> Difficulty {
    match opponent_rating {
        r if r >= 1600 => Difficulty::Boss,
        r if r >= 1300 => Difficulty::Hard,
        r if r >= 1100 => Difficulty::Medium,
        _ => Difficulty::Easy,
    }
}

/// Outcome of an arena fight, NPC or PvP.
#[derive(Debug)]
pub struct ArenaOutcome {
    pub opponent_name: String,
    pub won: bool,
    pub rating_delta: i32,
    pub new_rating: i32,
    pub battle_log: Vec<String>,
    pub drops: Vec<MaterialDrop>,
}

async fn adjust_rating(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    delta: i32,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        "UPDATE characters SET arena_rating = GREATEST(arena_rating + $2, 0)
         WHERE character_id = $1 RETURNING arena_rating",
    )
    .bind(character_id)
    .bind(delta)
    .fetch_one(&mut **tx)
    .await
}

async fn record_match(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    opponent_kind: &str,
    opponent_name: &str,
    opponent_character_id: Option<i64>,
    won: bool,
    rating_delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO arena_matches (character_id, opponent_kind, opponent_name, opponent_character_id, won, rating_delta)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(character_id)
    .bind(opponent_kind)
    .bind(opponent_name)
    .bind(opponent_character_id)
    .bind(won)
    .bind(rating_delta)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn unit_for(character: &Character) -> BattleUnit {
    BattleUnit::new(
        character.name.clone(),
        character.attack,
        character.defense,
        character.health,
    )
}

/// Fights the ladder NPC matched to the character's rating.
pub async fn fight_npc(pool: &PgPool, character_id: i64) -> Result<ArenaOutcome, String> {
    let character = super::characters::get_character(pool, character_id)
        .await
        .map_err(|_| "Could not find your character.".to_string())?;
    let npc = ladder_opponent(character.arena_rating);

    let report = {
        let mut rng = rand::rng();
        resolve_battle(
            vec![unit_for(&character)],
            vec![BattleUnit::new(npc.name, npc.attack, npc.defense, npc.health)],
            &mut rng,
        )
    };
    let won = report.attacker_won();
    let delta = if won { ARENA_RATING_K } else { -ARENA_RATING_K };
    let drops = if won {
        roll_material_drops(ActivityKind::ArenaNpc, npc.difficulty)
    } else {
        Vec::new()
    };

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;
    let new_rating = adjust_rating(&mut tx, character_id, delta)
        .await
        .map_err(|_| "Failed to adjust your rating.".to_string())?;
    record_match(&mut tx, character_id, "npc", npc.name, None, won, delta)
        .await
        .map_err(|_| "Failed to record the match.".to_string())?;
    if won {
        add_materials(&mut tx, character_id, &drops)
            .await
            .map_err(|_| "Failed to store your loot.".to_string())?;
        super::guilds::add_war_points(&mut tx, character_id, 1)
            .await
            .map_err(|_| "Failed to credit your guild war.".to_string())?;
    }
    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;

    tracing::info!(
        target: "arena.npc",
        character_id,
        opponent = npc.name,
        won,
        delta,
        "arena fight resolved"
    );

    Ok(ArenaOutcome {
        opponent_name: npc.name.to_string(),
        won,
        rating_delta: delta,
        new_rating,
        battle_log: report.log,
        drops,
    })
}

/// Fights another character's current build. The defender loses or gains
/// rating too, but only the attacker initiates and only the winner loots.
pub async fn fight_pvp(
    pool: &PgPool,
    character_id: i64,
    opponent_id: i64,
) -> Result<ArenaOutcome, String> {
    if character_id == opponent_id {
        return Err("You cannot fight yourself.".to_string());
    }
    let character = super::characters::get_character(pool, character_id)
        .await
        .map_err(|_| "Could not find your character.".to_string())?;
    let opponent = super::characters::get_character(pool, opponent_id)
        .await
        .map_err(|_| "That opponent does not exist.".to_string())?;

    let report = {
        let mut rng = rand::rng();
        resolve_battle(vec![unit_for(&character)], vec![unit_for(&opponent)], &mut rng)
    };
    let won = report.attacker_won();
    let (my_delta, their_delta) = if won {
        (ARENA_RATING_K, -ARENA_RATING_K)
    } else {
        (-ARENA_RATING_K, ARENA_RATING_K)
    };
    let drops = if won {
        roll_material_drops(ActivityKind::ArenaPvp, pvp_difficulty(opponent.arena_rating))
    } else {
        Vec::new()
    };

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;
    let new_rating = adjust_rating(&mut tx, character_id, my_delta)
        .await
        .map_err(|_| "Failed to adjust your rating.".to_string())?;
    adjust_rating(&mut tx, opponent_id, their_delta)
        .await
        .map_err(|_| "Failed to adjust the opponent's rating.".to_string())?;
    record_match(
        &mut tx,
        character_id,
        "pvp",
        &opponent.name,
        Some(opponent_id),
        won,
        my_delta,
    )
    .await
    .map_err(|_| "Failed to record the match.".to_string())?;
    record_match(
        &mut tx,
        opponent_id,
        "pvp",
        &character.name,
        Some(character_id),
        !won,
        their_delta,
    )
    .await
    .map_err(|_| "Failed to record the match.".to_string())?;
    if won {
        add_materials(&mut tx, character_id, &drops)
            .await
            .map_err(|_| "Failed to store your loot.".to_string())?;
        super::guilds::add_war_points(&mut tx, character_id, 2)
            .await
            .map_err(|_| "Failed to credit your guild war.".to_string())?;
    }
    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;

    Ok(ArenaOutcome {
        opponent_name: opponent.name,
        won,
        rating_delta: my_delta,
        new_rating,
        battle_log: report.log,
        drops,
    })
}

/// The character's recent match history, newest first.
pub async fn match_history(
    pool: &PgPool,
    character_id: i64,
    limit: i64,
) -> Result<Vec<ArenaMatch>, sqlx::Error> {
    sqlx::query_as::<_, ArenaMatch>(
        "SELECT * FROM arena_matches WHERE character_id = $1 ORDER BY fought_at DESC LIMIT $2",
    )
    .bind(character_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
