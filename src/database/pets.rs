//! Contains all database functions related to pets.
//! This includes adoption, training timers, and companion status.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use super::characters::get_character_for_update;
use super::economy::add_gold;
use super::models::{CharacterPet, Pet};
use crate::constants::{MAX_PET_STABLE, PET_TRAINING_HOURS, PET_TRAINING_STAT_GAIN};

const TRAINABLE_STATS: [&str; 3] = ["attack", "defense", "health"];

/// Fetches the adoptable pet catalog.
pub async fn list_catalog(pool: &PgPool) -> Result<Vec<Pet>, sqlx::Error> {
    sqlx::query_as::<_, Pet>("SELECT * FROM pets ORDER BY adopt_cost, pet_id")
        .fetch_all(pool)
        .await
}

/// Fetches all pets owned by a character, joining the master table for
/// species names. Companion first, then by level.
pub async fn get_character_pets(
    pool: &PgPool,
    character_id: i64,
) -> Result<Vec<CharacterPet>, sqlx::Error> {
    sqlx::query_as::<_, CharacterPet>(
        "SELECT cp.*, p.name FROM character_pets cp JOIN pets p ON cp.pet_id = p.pet_id
         WHERE cp.character_id = $1 ORDER BY cp.is_companion DESC, cp.level DESC",
    )
    .bind(character_id)
    .fetch_all(pool)
    .await
}

/// The pet currently fighting alongside the character, if any.
pub async fn get_companion(
    pool: &PgPool,
    character_id: i64,
) -> Result<Option<CharacterPet>, sqlx::Error> {
    sqlx::query_as::<_, CharacterPet>(
        "SELECT cp.*, p.name FROM character_pets cp JOIN pets p ON cp.pet_id = p.pet_id
         WHERE cp.character_id = $1 AND cp.is_companion = TRUE",
    )
    .bind(character_id)
    .fetch_optional(pool)
    .await
}

/// A transaction to adopt a pet: gold check, stable-size cap, then the
/// pet row seeded from its base stats.
pub async fn adopt_pet(pool: &PgPool, character_id: i64, pet_id: i32) -> Result<String, String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let pet = sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE pet_id = $1")
        .bind(pet_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|_| "That pet is not up for adoption.".to_string())?;

    get_character_for_update(&mut tx, character_id)
        .await
        .map_err(|_| "Could not find your character.".to_string())?;

    let stable_size: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM character_pets WHERE character_id = $1",
    )
    .bind(character_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;
    if stable_size >= MAX_PET_STABLE {
        tx.rollback().await.ok();
        return Err(format!(
            "Your stable is full ({}/{}).",
            stable_size, MAX_PET_STABLE
        ));
    }

    if add_gold(&mut tx, character_id, -pet.adopt_cost).await.is_err() {
        tx.rollback().await.ok();
        return Err(format!(
            "Adopting {} costs {} gold.",
            pet.name, pet.adopt_cost
        ));
    }

    sqlx::query(
        "INSERT INTO character_pets (character_id, pet_id, attack, defense, health)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(character_id)
    .bind(pet_id)
    .bind(pet.base_attack)
    .bind(pet.base_defense)
    .bind(pet.base_health)
    .execute(&mut *tx)
    .await
    .map_err(|_| "Failed to add the pet to your stable.".to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok(pet.name)
}

/// Renames a pet.
pub async fn set_nickname(
    pool: &PgPool,
    character_id: i64,
    character_pet_id: i64,
    nickname: &str,
) -> Result<(), String> {
    let nickname = nickname.trim();
    if nickname.is_empty() || nickname.len() > 24 {
        return Err("Nicknames must be between 1 and 24 characters.".to_string());
    }
    let res = sqlx::query(
        "UPDATE character_pets SET nickname = $3 WHERE character_pet_id = $1 AND character_id = $2",
    )
    .bind(character_pet_id)
    .bind(character_id)
    .bind(nickname)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;
    if res.rows_affected() == 1 {
        Ok(())
    } else {
        Err("That pet is not yours.".to_string())
    }
}

/// Makes one pet the active companion, clearing any previous one. A pet
/// in training cannot fight.
pub async fn set_companion(
    pool: &PgPool,
    character_id: i64,
    character_pet_id: i64,
) -> Result<(), String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let is_training: bool = sqlx::query_scalar::<_, bool>(
        "SELECT is_training FROM character_pets WHERE character_pet_id = $1 AND character_id = $2 FOR UPDATE",
    )
    .bind(character_pet_id)
    .bind(character_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| e.to_string())?
    .ok_or_else(|| "That pet is not yours.".to_string())?;
    if is_training {
        tx.rollback().await.ok();
        return Err("That pet is still training.".to_string());
    }

    sqlx::query("UPDATE character_pets SET is_companion = FALSE WHERE character_id = $1")
        .bind(character_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| e.to_string())?;
    sqlx::query("UPDATE character_pets SET is_companion = TRUE WHERE character_pet_id = $1")
        .bind(character_pet_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| e.to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok(())
}

/// Sends a pet off to train one stat for a fixed number of hours. A
/// training pet is benched from the companion slot.
pub async fn start_training(
    pool: &PgPool,
    character_id: i64,
    character_pet_id: i64,
    stat: &str,
) -> Result<chrono::DateTime<Utc>, String> {
    if !TRAINABLE_STATS.contains(&stat) {
        return Err(format!(
            "Pets can train: {}.",
            TRAINABLE_STATS.join(", ")
        ));
    }

    let ends_at = Utc::now() + Duration::hours(PET_TRAINING_HOURS);
    let res = sqlx::query(
        "UPDATE character_pets SET is_training = TRUE, training_stat = $3, training_ends_at = $4, is_companion = FALSE
         WHERE character_pet_id = $1 AND character_id = $2 AND is_training = FALSE",
    )
    .bind(character_pet_id)
    .bind(character_id)
    .bind(stat)
    .bind(ends_at)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;
    if res.rows_affected() == 1 {
        Ok(ends_at)
    } else {
        Err("That pet is not yours or is already training.".to_string())
    }
}

/// Collects a finished training session: timestamp comparison against
/// `training_ends_at`, then the stat bump.
pub async fn collect_training(
    pool: &PgPool,
    character_id: i64,
    character_pet_id: i64,
) -> Result<(String, i32), String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let pet = sqlx::query_as::<_, CharacterPet>(
        "SELECT cp.*, p.name FROM character_pets cp JOIN pets p ON cp.pet_id = p.pet_id
         WHERE cp.character_pet_id = $1 AND cp.character_id = $2 FOR UPDATE OF cp",
    )
    .bind(character_pet_id)
    .bind(character_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| e.to_string())?
    .ok_or_else(|| "That pet is not yours.".to_string())?;

    if !pet.is_training {
        tx.rollback().await.ok();
        return Err("That pet is not training.".to_string());
    }
    let ends_at = pet
        .training_ends_at
        .ok_or_else(|| "Training data is corrupt.".to_string())?;
    if Utc::now() < ends_at {
        tx.rollback().await.ok();
        let remaining = (ends_at - Utc::now()).num_minutes().max(1);
        return Err(format!("Training finishes in about {} minutes.", remaining));
    }
    let stat = pet
        .training_stat
        .clone()
        .ok_or_else(|| "Training data is corrupt.".to_string())?;

    let column = match stat.as_str() {
        "attack" => "attack",
        "defense" => "defense",
        "health" => "health",
        _ => return Err("Training data is corrupt.".to_string()),
    };
    // Health trains in bigger increments than the flat stats.
    let gain = if column == "health" {
        PET_TRAINING_STAT_GAIN * 5
    } else {
        PET_TRAINING_STAT_GAIN
    };
    sqlx::query(&format!(
        "UPDATE character_pets SET {column} = {column} + $2, is_training = FALSE,
             training_stat = NULL, training_ends_at = NULL
         WHERE character_pet_id = $1"
    ))
    .bind(character_pet_id)
    .bind(gain)
    .execute(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok((stat, gain))
}
