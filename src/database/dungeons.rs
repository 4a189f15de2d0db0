//! Contains all database functions related to dungeons: the catalog and
//! the floor-by-floor run lifecycle.

use sqlx::{PgPool, Postgres, Transaction};

use super::characters::{get_character_for_update, spend_energy};
use super::economy::{add_gold, add_materials};
use super::models::{Character, Dungeon, DungeonFloor, DungeonRun};
use crate::game::battle::{BattleUnit, resolve_battle};
use crate::loot::{ActivityKind, Difficulty, MaterialDrop, roll_material_drops};

/// Result of clearing the final floor.
#[derive(Debug)]
pub struct DungeonRewards {
    pub gold: i64,
    pub xp: i64,
    pub new_level: i32,
    pub did_level_up: bool,
    pub drops: Vec<MaterialDrop>,
}

/// Result of fighting one floor.
#[derive(Debug)]
pub struct FloorOutcome {
    pub floor: i32,
    pub victory: bool,
    pub battle_log: Vec<String>,
    /// Set only when this floor was the last one and the run is cleared.
    pub rewards: Option<DungeonRewards>,
}

pub async fn list_dungeons(pool: &PgPool) -> Result<Vec<Dungeon>, sqlx::Error> {
    sqlx::query_as::<_, Dungeon>("SELECT * FROM dungeons ORDER BY min_level, dungeon_id")
        .fetch_all(pool)
        .await
}

async fn get_dungeon(pool: &PgPool, dungeon_id: i32) -> Result<Dungeon, sqlx::Error> {
    sqlx::query_as::<_, Dungeon>("SELECT * FROM dungeons WHERE dungeon_id = $1")
        .bind(dungeon_id)
        .fetch_one(pool)
        .await
}

/// Returns the character's open run, if any.
pub async fn get_active_run(
    pool: &PgPool,
    character_id: i64,
) -> Result<Option<DungeonRun>, sqlx::Error> {
    sqlx::query_as::<_, DungeonRun>(
        "SELECT * FROM dungeon_runs WHERE character_id = $1 AND status = 'active'",
    )
    .bind(character_id)
    .fetch_optional(pool)
    .await
}

async fn get_floor(
    pool: &PgPool,
    dungeon_id: i32,
    floor: i32,
) -> Result<DungeonFloor, sqlx::Error> {
    sqlx::query_as::<_, DungeonFloor>(
        "SELECT * FROM dungeon_floors WHERE dungeon_id = $1 AND floor = $2",
    )
    .bind(dungeon_id)
    .bind(floor)
    .fetch_one(pool)
    .await
}

/// A transaction to enter a dungeon: level gate, one-open-run gate,
/// energy debit, then the run row.
pub async fn enter_dungeon(
    pool: &PgPool,
    character_id: i64,
    dungeon_id: i32,
) -> Result<DungeonRun, String> {
    let dungeon = get_dungeon(pool, dungeon_id)
        .await
        .map_err(|_| "That dungeon does not exist.".to_string())?;

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let character = get_character_for_update(&mut tx, character_id)
        .await
        .map_err(|_| "Could not find your character.".to_string())?;
    if character.level < dungeon.min_level {
        tx.rollback().await.ok();
        return Err(format!(
            "You must be level {} to enter {}.",
            dungeon.min_level, dungeon.name
        ));
    }

    let open_runs: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM dungeon_runs WHERE character_id = $1 AND status = 'active'",
    )
    .bind(character_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;
    if open_runs > 0 {
        tx.rollback().await.ok();
        return Err("You are already inside a dungeon.".to_string());
    }

    if spend_energy(&mut tx, character_id, dungeon.energy_cost)
        .await
        .is_err()
    {
        tx.rollback().await.ok();
        return Err(format!(
            "You don't have enough energy. {} costs {} energy.",
            dungeon.name, dungeon.energy_cost
        ));
    }

    let run = sqlx::query_as::<_, DungeonRun>(
        "INSERT INTO dungeon_runs (character_id, dungeon_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(character_id)
    .bind(dungeon_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|_| "Failed to open the dungeon run.".to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok(run)
}

/// Builds the attacking party: the character plus their companion pet.
fn build_party(character: &Character, companion: Option<&super::models::CharacterPet>) -> Vec<BattleUnit> {
    let mut party = vec![BattleUnit::new(
        character.name.clone(),
        character.attack,
        character.defense,
        character.health,
    )];
    if let Some(pet) = companion {
        let shown = pet.nickname.as_deref().unwrap_or(&pet.name);
        party.push(BattleUnit::new(shown, pet.attack, pet.defense, pet.health));
    }
    party
}

fn build_enemies(floor: &DungeonFloor) -> Vec<BattleUnit> {
    (0..floor.enemy_count.max(1))
        .map(|i| {
            let name = if floor.enemy_count > 1 {
                format!("{} {}", floor.enemy_name, i + 1)
            } else {
                floor.enemy_name.clone()
            };
            BattleUnit::new(
                name,
                floor.enemy_attack,
                floor.enemy_defense,
                floor.enemy_health,
            )
        })
        .collect()
}

/// Fights the current floor of the open run. Victory advances the run;
/// clearing the final floor completes it and pays out; defeat closes it
/// with nothing.
pub async fn advance_floor(pool: &PgPool, character_id: i64) -> Result<FloorOutcome, String> {
    let run = get_active_run(pool, character_id)
        .await
        .map_err(|_| "Could not check your dungeon run.".to_string())?
        .ok_or_else(|| "You are not inside a dungeon.".to_string())?;

    let dungeon = get_dungeon(pool, run.dungeon_id)
        .await
        .map_err(|_| "Dungeon data is missing.".to_string())?;
    let floor = get_floor(pool, run.dungeon_id, run.current_floor)
        .await
        .map_err(|_| "Floor data is missing.".to_string())?;
    let character = super::characters::get_character(pool, character_id)
        .await
        .map_err(|_| "Could not find your character.".to_string())?;
    let companion = super::pets::get_companion(pool, character_id)
        .await
        .map_err(|_| "Could not check your companion.".to_string())?;

    // Resolve the battle in a block so the RNG is dropped before the
    // transaction awaits.
    let report = {
        let mut rng = rand::rng();
        resolve_battle(
            build_party(&character, companion.as_ref()),
            build_enemies(&floor),
            &mut rng,
        )
    };

    if !report.attacker_won() {
        let res = sqlx::query(
            "UPDATE dungeon_runs SET status = 'defeated', finished_at = NOW()
             WHERE run_id = $1 AND status = 'active'",
        )
        .bind(run.run_id)
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;
        if res.rows_affected() != 1 {
            return Err("This run is already over.".to_string());
        }
        return Ok(FloorOutcome {
            floor: run.current_floor,
            victory: false,
            battle_log: report.log,
            rewards: None,
        });
    }

    if run.current_floor < dungeon.floors {
        let res = sqlx::query(
            "UPDATE dungeon_runs SET current_floor = current_floor + 1
             WHERE run_id = $1 AND status = 'active' AND current_floor = $2",
        )
        .bind(run.run_id)
        .bind(run.current_floor)
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;
        if res.rows_affected() != 1 {
            return Err("This run was already advanced.".to_string());
        }
        return Ok(FloorOutcome {
            floor: run.current_floor,
            victory: true,
            battle_log: report.log,
            rewards: None,
        });
    }

    // Final floor cleared: pay out inside one transaction.
    let difficulty: Difficulty = dungeon
        .difficulty
        .parse()
        .map_err(|_| "Dungeon data is corrupt.".to_string())?;
    let drops = roll_material_drops(ActivityKind::Dungeon, difficulty);

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;
    let flipped = sqlx::query(
        "UPDATE dungeon_runs SET status = 'cleared', finished_at = NOW()
         WHERE run_id = $1 AND status = 'active'",
    )
    .bind(run.run_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;
    if flipped.rows_affected() != 1 {
        tx.rollback().await.ok();
        return Err("This run was already settled.".to_string());
    }

    let rewards = pay_out(&mut tx, character_id, &dungeon, drops).await?;
    super::guilds::add_war_points(&mut tx, character_id, 1)
        .await
        .map_err(|_| "Failed to credit your guild war.".to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;

    tracing::info!(
        target: "dungeons.clear",
        character_id,
        dungeon = %dungeon.name,
        gold = rewards.gold,
        drops = rewards.drops.len(),
        "dungeon cleared"
    );

    Ok(FloorOutcome {
        floor: run.current_floor,
        victory: true,
        battle_log: report.log,
        rewards: Some(rewards),
    })
}

async fn pay_out(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    dungeon: &Dungeon,
    drops: Vec<MaterialDrop>,
) -> Result<DungeonRewards, String> {
    add_gold(tx, character_id, dungeon.reward_gold)
        .await
        .map_err(|_| "Failed to pay the dungeon reward.".to_string())?;
    let leveling = super::characters::apply_progression(tx, character_id, dungeon.reward_xp)
        .await
        .map_err(|_| "Failed to apply experience.".to_string())?;
    add_materials(tx, character_id, &drops)
        .await
        .map_err(|_| "Failed to store your loot.".to_string())?;
    Ok(DungeonRewards {
        gold: dungeon.reward_gold,
        xp: dungeon.reward_xp,
        new_level: leveling.new_level,
        did_level_up: leveling.did_level_up,
        drops,
    })
}

/// Walks out of the dungeon. The run is closed and energy is not refunded.
pub async fn abandon_run(pool: &PgPool, character_id: i64) -> Result<(), String> {
    let res = sqlx::query(
        "UPDATE dungeon_runs SET status = 'abandoned', finished_at = NOW()
         WHERE character_id = $1 AND status = 'active'",
    )
    .bind(character_id)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;
    if res.rows_affected() == 1 {
        Ok(())
    } else {
        Err("You are not inside a dungeon.".to_string())
    }
}
