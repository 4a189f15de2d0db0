//! Contains all database functions related to missions: the catalog,
//! starting, timed completion, and abandonment.

use chrono::Duration;
use sqlx::PgPool;

use super::characters::{get_character_for_update, spend_energy};
use super::economy::{add_gold, add_materials};
use super::models::{CharacterMission, Mission};
use crate::loot::{ActivityKind, Difficulty, MaterialDrop, roll_material_drops};

/// Everything granted by a completed mission, returned to the client.
#[derive(Debug)]
pub struct MissionOutcome {
    pub mission: Mission,
    pub gold: i64,
    pub xp: i64,
    pub new_level: i32,
    pub did_level_up: bool,
    pub drops: Vec<MaterialDrop>,
}

/// Fetches the mission catalog, cheapest first.
pub async fn list_missions(pool: &PgPool) -> Result<Vec<Mission>, sqlx::Error> {
    sqlx::query_as::<_, Mission>("SELECT * FROM missions ORDER BY min_level, mission_id")
        .fetch_all(pool)
        .await
}

async fn get_mission(pool: &PgPool, mission_id: i32) -> Result<Mission, sqlx::Error> {
    sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE mission_id = $1")
        .bind(mission_id)
        .fetch_one(pool)
        .await
}

/// Returns the character's in-progress mission, if any.
pub async fn get_active_mission(
    pool: &PgPool,
    character_id: i64,
) -> Result<Option<CharacterMission>, sqlx::Error> {
    sqlx::query_as::<_, CharacterMission>(
        "SELECT * FROM character_missions WHERE character_id = $1 AND status = 'active'",
    )
    .bind(character_id)
    .fetch_optional(pool)
    .await
}

/// A transaction to start a mission: level gate, single-mission gate,
/// energy debit, then the timer row.
pub async fn start_mission(
    pool: &PgPool,
    character_id: i64,
    mission_id: i32,
) -> Result<CharacterMission, String> {
    let mission = get_mission(pool, mission_id)
        .await
        .map_err(|_| "That mission does not exist.".to_string())?;

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let character = get_character_for_update(&mut tx, character_id)
        .await
        .map_err(|_| "Could not find your character.".to_string())?;
    if character.level < mission.min_level {
        tx.rollback().await.ok();
        return Err(format!(
            "You must be level {} to attempt '{}'.",
            mission.min_level, mission.name
        ));
    }

    let already_active: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM character_missions WHERE character_id = $1 AND status = 'active'",
    )
    .bind(character_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;
    if already_active > 0 {
        tx.rollback().await.ok();
        return Err("You are already on a mission.".to_string());
    }

    if spend_energy(&mut tx, character_id, mission.energy_cost)
        .await
        .is_err()
    {
        tx.rollback().await.ok();
        return Err(format!(
            "You don't have enough energy. '{}' costs {} energy.",
            mission.name, mission.energy_cost
        ));
    }

    let ends_at = chrono::Utc::now() + Duration::minutes(mission.duration_minutes as i64);
    let row = sqlx::query_as::<_, CharacterMission>(
        "INSERT INTO character_missions (character_id, mission_id, ends_at) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(character_id)
    .bind(mission_id)
    .bind(ends_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|_| "Failed to start the mission.".to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok(row)
}

/// A transaction to complete the active mission once its timer has run
/// out. The status flip is guarded in SQL so a double submit cannot pay
/// rewards twice.
pub async fn complete_mission(pool: &PgPool, character_id: i64) -> Result<MissionOutcome, String> {
    let active = get_active_mission(pool, character_id)
        .await
        .map_err(|_| "Could not check your missions.".to_string())?
        .ok_or_else(|| "You are not on a mission.".to_string())?;

    if chrono::Utc::now() < active.ends_at {
        let remaining = (active.ends_at - chrono::Utc::now()).num_seconds().max(1);
        return Err(format!(
            "The mission is not finished yet. {}s remaining.",
            remaining
        ));
    }

    let mission = get_mission(pool, active.mission_id)
        .await
        .map_err(|_| "Mission data is missing.".to_string())?;
    let difficulty: Difficulty = mission
        .difficulty
        .parse()
        .map_err(|_| "Mission data is corrupt.".to_string())?;

    // Roll loot before opening the transaction; the RNG must not live
    // across an await.
    let drops = roll_material_drops(ActivityKind::Mission, difficulty);

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let flipped = sqlx::query(
        "UPDATE character_missions SET status = 'completed', completed_at = NOW()
         WHERE character_mission_id = $1 AND status = 'active'",
    )
    .bind(active.character_mission_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;
    if flipped.rows_affected() != 1 {
        tx.rollback().await.ok();
        return Err("This mission was already turned in.".to_string());
    }

    add_gold(&mut tx, character_id, mission.reward_gold)
        .await
        .map_err(|_| "Failed to pay the mission reward.".to_string())?;
    let leveling = super::characters::apply_progression(&mut tx, character_id, mission.reward_xp)
        .await
        .map_err(|_| "Failed to apply experience.".to_string())?;
    add_materials(&mut tx, character_id, &drops)
        .await
        .map_err(|_| "Failed to store your loot.".to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;

    tracing::info!(
        target: "missions.complete",
        character_id,
        mission = %mission.name,
        gold = mission.reward_gold,
        xp = mission.reward_xp,
        drops = drops.len(),
        "mission completed"
    );

    Ok(MissionOutcome {
        gold: mission.reward_gold,
        xp: mission.reward_xp,
        new_level: leveling.new_level,
        did_level_up: leveling.did_level_up,
        drops,
        mission,
    })
}

/// Abandons the active mission. Spent energy is not refunded.
pub async fn abandon_mission(pool: &PgPool, character_id: i64) -> Result<(), String> {
    let res = sqlx::query(
        "UPDATE character_missions SET status = 'abandoned', completed_at = NOW()
         WHERE character_id = $1 AND status = 'active'",
    )
    .bind(character_id)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;
    if res.rows_affected() == 1 {
        Ok(())
    } else {
        Err("You are not on a mission.".to_string())
    }
}
