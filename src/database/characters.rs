//! Contains all database functions related to characters themselves:
//! creation, lookup, energy, progression, and presence.

use sqlx::{PgPool, Postgres, Transaction};

use super::models::Character;
use crate::game::energy::calculate_energy_recharge;
use crate::game::leveling::{LevelUpResult, handle_character_leveling};
use crate::items::Item;

const CLASSES: [&str; 4] = ["warrior", "mage", "archer", "rogue"];

/// Creates a new character. Names are unique across the realm.
pub async fn create_character(
    pool: &PgPool,
    name: &str,
    class: &str,
) -> Result<Character, String> {
    let name = name.trim();
    if name.len() < 3 || name.len() > 24 {
        return Err("Character names must be between 3 and 24 characters.".to_string());
    }
    if !CLASSES.contains(&class) {
        return Err(format!(
            "'{}' is not a playable class. Pick one of: {}.",
            class,
            CLASSES.join(", ")
        ));
    }

    sqlx::query_as::<_, Character>(
        "INSERT INTO characters (name, class) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(class)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            format!("The name '{}' is already taken.", name)
        }
        _ => "Could not create your character.".to_string(),
    })
}

/// Fetches a character by id.
pub async fn get_character(pool: &PgPool, character_id: i64) -> Result<Character, sqlx::Error> {
    sqlx::query_as::<_, Character>("SELECT * FROM characters WHERE character_id = $1")
        .bind(character_id)
        .fetch_one(pool)
        .await
}

/// Fetches a character and lazily applies energy regeneration, persisting
/// the recharge when any was earned.
pub async fn get_character_refreshed(
    pool: &PgPool,
    character_id: i64,
) -> Result<Character, sqlx::Error> {
    let mut character = get_character(pool, character_id).await?;
    let (new_energy, needs_update) = calculate_energy_recharge(&character);
    if needs_update {
        sqlx::query(
            "UPDATE characters SET energy = $2, last_energy_update = NOW() WHERE character_id = $1",
        )
        .bind(character_id)
        .bind(new_energy)
        .execute(pool)
        .await?;
        character.energy = new_energy;
    }
    Ok(character)
}

/// Locks and returns a character row inside a transaction.
pub async fn get_character_for_update(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
) -> Result<Character, sqlx::Error> {
    sqlx::query_as::<_, Character>("SELECT * FROM characters WHERE character_id = $1 FOR UPDATE")
        .bind(character_id)
        .fetch_one(&mut **tx)
        .await
}

/// Debits energy. Fails with `RowNotFound` when the character does not
/// have enough, so callers can turn it into a domain message.
pub async fn spend_energy(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    amount: i32,
) -> Result<(), sqlx::Error> {
    let res = sqlx::query(
        "UPDATE characters SET energy = energy - $2, last_energy_update = NOW()
         WHERE character_id = $1 AND energy >= $2",
    )
    .bind(character_id)
    .bind(amount)
    .execute(&mut **tx)
    .await?;
    if res.rows_affected() == 1 {
        Ok(())
    } else {
        Err(sqlx::Error::RowNotFound)
    }
}

/// Restores energy, clamped to the character's maximum.
pub async fn restore_energy(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    amount: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE characters SET energy = LEAST(energy + $2, max_energy) WHERE character_id = $1",
    )
    .bind(character_id)
    .bind(amount)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Feeds experience into the character's level curve and persists level,
/// overflow XP, and stat gains in one update.
pub async fn apply_progression(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    xp_gained: i64,
) -> Result<LevelUpResult, sqlx::Error> {
    let character = get_character_for_update(tx, character_id).await?;
    let result = handle_character_leveling(character.level, character.experience, xp_gained);
    sqlx::query(
        "UPDATE characters SET level = $2, experience = $3,
             attack = attack + $4, defense = defense + $5, health = health + $6,
             max_energy = max_energy + $7
         WHERE character_id = $1",
    )
    .bind(character_id)
    .bind(result.new_level)
    .bind(result.new_xp)
    .bind(result.stat_gains.0)
    .bind(result.stat_gains.1)
    .bind(result.stat_gains.2)
    .bind(result.new_level - character.level) // +1 max energy per level
    .execute(&mut **tx)
    .await?;
    Ok(result)
}

/// Stamps the presence timestamp. Called from the heartbeat endpoint.
pub async fn touch_presence(pool: &PgPool, character_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE characters SET last_seen_at = NOW() WHERE character_id = $1")
        .bind(character_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// A transaction to drink an Energy Tonic from the inventory.
pub async fn use_energy_tonic(pool: &PgPool, character_id: i64) -> Result<Character, String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    if super::economy::add_to_inventory(&mut tx, character_id, Item::EnergyTonic, -1)
        .await
        .is_err()
    {
        tx.rollback().await.ok();
        return Err("You don't have an Energy Tonic.".to_string());
    }
    if restore_energy(&mut tx, character_id, 5).await.is_err() {
        tx.rollback().await.ok();
        return Err("Failed to restore your energy.".to_string());
    }

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    get_character(pool, character_id)
        .await
        .map_err(|_| "Could not reload your character.".to_string())
}
