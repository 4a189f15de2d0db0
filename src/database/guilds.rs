//! Contains all database functions related to guilds: membership, roles,
//! contributions, and the guild-war lifecycle.

use chrono::{Duration, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::economy::add_gold;
use super::models::{Guild, GuildMember, GuildWar};
use crate::constants::{GUILD_CREATE_COST, GUILD_WAR_DURATION_HOURS, GUILD_WAR_PRIZE};

/// A transaction to found a guild. The founder pays the creation fee and
/// becomes leader.
pub async fn create_guild(
    pool: &PgPool,
    character_id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<Guild, String> {
    let name = name.trim();
    if name.len() < 3 || name.len() > 32 {
        return Err("Guild names must be between 3 and 32 characters.".to_string());
    }

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    if membership_in_tx(&mut tx, character_id)
        .await
        .map_err(|e| e.to_string())?
        .is_some()
    {
        tx.rollback().await.ok();
        return Err("You are already in a guild.".to_string());
    }

    if add_gold(&mut tx, character_id, -GUILD_CREATE_COST)
        .await
        .is_err()
    {
        tx.rollback().await.ok();
        return Err(format!(
            "Founding a guild costs {} gold.",
            GUILD_CREATE_COST
        ));
    }

    let guild = sqlx::query_as::<_, Guild>(
        "INSERT INTO guilds (name, description, leader_id) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(character_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            format!("A guild named '{}' already exists.", name)
        }
        _ => "Failed to found the guild.".to_string(),
    })?;

    sqlx::query("INSERT INTO guild_members (guild_id, character_id, role) VALUES ($1, $2, 'leader')")
        .bind(guild.guild_id)
        .bind(character_id)
        .execute(&mut *tx)
        .await
        .map_err(|_| "Failed to enroll you as leader.".to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok(guild)
}

pub async fn get_guild(pool: &PgPool, guild_id: i64) -> Result<Guild, sqlx::Error> {
    sqlx::query_as::<_, Guild>("SELECT * FROM guilds WHERE guild_id = $1")
        .bind(guild_id)
        .fetch_one(pool)
        .await
}

pub async fn list_guilds(pool: &PgPool) -> Result<Vec<Guild>, sqlx::Error> {
    sqlx::query_as::<_, Guild>("SELECT * FROM guilds ORDER BY treasury DESC, name")
        .fetch_all(pool)
        .await
}

/// (guild_id, role) of the character's membership, if any.
pub async fn get_membership(
    pool: &PgPool,
    character_id: i64,
) -> Result<Option<(i64, String)>, sqlx::Error> {
    sqlx::query_as::<_, (i64, String)>(
        "SELECT guild_id, role FROM guild_members WHERE character_id = $1",
    )
    .bind(character_id)
    .fetch_optional(pool)
    .await
}

async fn membership_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
) -> Result<Option<(i64, String)>, sqlx::Error> {
    sqlx::query_as::<_, (i64, String)>(
        "SELECT guild_id, role FROM guild_members WHERE character_id = $1 FOR UPDATE",
    )
    .bind(character_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Fetches a guild's roster with character names, leader first.
pub async fn list_members(pool: &PgPool, guild_id: i64) -> Result<Vec<GuildMember>, sqlx::Error> {
    sqlx::query_as::<_, GuildMember>(
        "SELECT gm.*, c.name FROM guild_members gm
         JOIN characters c ON gm.character_id = c.character_id
         WHERE gm.guild_id = $1
         ORDER BY CASE gm.role WHEN 'leader' THEN 0 WHEN 'officer' THEN 1 ELSE 2 END, gm.joined_at",
    )
    .bind(guild_id)
    .fetch_all(pool)
    .await
}

pub async fn join_guild(pool: &PgPool, character_id: i64, guild_id: i64) -> Result<(), String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    if membership_in_tx(&mut tx, character_id)
        .await
        .map_err(|e| e.to_string())?
        .is_some()
    {
        tx.rollback().await.ok();
        return Err("You are already in a guild. Leave it first.".to_string());
    }

    sqlx::query("INSERT INTO guild_members (guild_id, character_id) VALUES ($1, $2)")
        .bind(guild_id)
        .bind(character_id)
        .execute(&mut *tx)
        .await
        .map_err(|_| "That guild does not exist.".to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok(())
}

/// Leaves the current guild. A leader may only leave an otherwise empty
/// guild, which is then disbanded.
pub async fn leave_guild(pool: &PgPool, character_id: i64) -> Result<(), String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let (guild_id, role) = membership_in_tx(&mut tx, character_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "You are not in a guild.".to_string())?;

    if role == "leader" {
        let others: i64 = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM guild_members WHERE guild_id = $1 AND character_id <> $2",
        )
        .bind(guild_id)
        .bind(character_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| e.to_string())?;
        if others > 0 {
            tx.rollback().await.ok();
            return Err(
                "A leader cannot abandon their guild. Transfer leadership first.".to_string(),
            );
        }
        sqlx::query("DELETE FROM guild_members WHERE guild_id = $1")
            .bind(guild_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;
        sqlx::query("DELETE FROM guild_wars WHERE challenger_guild_id = $1 OR defender_guild_id = $1")
            .bind(guild_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;
        sqlx::query("DELETE FROM guilds WHERE guild_id = $1")
            .bind(guild_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;
    } else {
        sqlx::query("DELETE FROM guild_members WHERE character_id = $1")
            .bind(character_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;
    }

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok(())
}

/// Leader-only: promote or demote a member, or hand over leadership.
pub async fn set_member_role(
    pool: &PgPool,
    leader_id: i64,
    target_id: i64,
    new_role: &str,
) -> Result<(), String> {
    if !["officer", "member", "leader"].contains(&new_role) {
        return Err(format!("'{}' is not a guild role.", new_role));
    }

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let (guild_id, role) = membership_in_tx(&mut tx, leader_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "You are not in a guild.".to_string())?;
    if role != "leader" {
        tx.rollback().await.ok();
        return Err("Only the guild leader can change roles.".to_string());
    }

    let res = sqlx::query(
        "UPDATE guild_members SET role = $3 WHERE guild_id = $1 AND character_id = $2",
    )
    .bind(guild_id)
    .bind(target_id)
    .bind(new_role)
    .execute(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;
    if res.rows_affected() != 1 {
        tx.rollback().await.ok();
        return Err("That character is not in your guild.".to_string());
    }

    // Handing over leadership demotes the old leader to officer.
    if new_role == "leader" {
        sqlx::query("UPDATE guild_members SET role = 'officer' WHERE guild_id = $1 AND character_id = $2")
            .bind(guild_id)
            .bind(leader_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;
        sqlx::query("UPDATE guilds SET leader_id = $2 WHERE guild_id = $1")
            .bind(guild_id)
            .bind(target_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;
    }

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok(())
}

/// Declares war on another guild. Leaders and officers only; a pair of
/// guilds can fight one war at a time.
pub async fn declare_war(
    pool: &PgPool,
    character_id: i64,
    defender_guild_id: i64,
) -> Result<GuildWar, String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let (guild_id, role) = membership_in_tx(&mut tx, character_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "You are not in a guild.".to_string())?;
    if role == "member" {
        tx.rollback().await.ok();
        return Err("Only leaders and officers can declare war.".to_string());
    }
    if guild_id == defender_guild_id {
        tx.rollback().await.ok();
        return Err("You cannot declare war on your own guild.".to_string());
    }

    let existing: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM guild_wars
         WHERE status = 'active'
           AND ((challenger_guild_id = $1 AND defender_guild_id = $2)
             OR (challenger_guild_id = $2 AND defender_guild_id = $1))",
    )
    .bind(guild_id)
    .bind(defender_guild_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;
    if existing > 0 {
        tx.rollback().await.ok();
        return Err("Your guilds are already at war.".to_string());
    }

    let starts_at = Utc::now();
    let ends_at = starts_at + Duration::hours(GUILD_WAR_DURATION_HOURS);
    let war = sqlx::query_as::<_, GuildWar>(
        "INSERT INTO guild_wars (challenger_guild_id, defender_guild_id, starts_at, ends_at)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(guild_id)
    .bind(defender_guild_id)
    .bind(starts_at)
    .bind(ends_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|_| "That guild does not exist.".to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;

    tracing::info!(
        target: "guilds.war",
        war_id = war.war_id,
        challenger = guild_id,
        defender = defender_guild_id,
        "war declared"
    );
    Ok(war)
}

/// Lists a guild's wars, settling any that have run out first. Settlement
/// is lazy: the first read after `ends_at` flips the war and pays the
/// winner's treasury.
pub async fn list_wars(pool: &PgPool, guild_id: i64) -> Result<Vec<GuildWar>, sqlx::Error> {
    settle_due_wars(pool).await?;
    sqlx::query_as::<_, GuildWar>(
        "SELECT * FROM guild_wars
         WHERE challenger_guild_id = $1 OR defender_guild_id = $1
         ORDER BY starts_at DESC",
    )
    .bind(guild_id)
    .fetch_all(pool)
    .await
}

/// Settles every war whose window has closed. The status flip is guarded
/// per row, so concurrent readers cannot double-pay the prize.
pub async fn settle_due_wars(pool: &PgPool) -> Result<(), sqlx::Error> {
    let due = sqlx::query_as::<_, GuildWar>(
        "SELECT * FROM guild_wars WHERE status = 'active' AND ends_at <= NOW()",
    )
    .fetch_all(pool)
    .await?;

    for war in due {
        let mut tx = pool.begin().await?;
        let flipped = sqlx::query(
            "UPDATE guild_wars SET status = 'settled' WHERE war_id = $1 AND status = 'active'",
        )
        .bind(war.war_id)
        .execute(&mut *tx)
        .await?;
        if flipped.rows_affected() != 1 {
            tx.rollback().await.ok();
            continue;
        }

        // A draw pays nobody.
        let winner = if war.challenger_score > war.defender_score {
            Some(war.challenger_guild_id)
        } else if war.defender_score > war.challenger_score {
            Some(war.defender_guild_id)
        } else {
            None
        };

        if let Some(winner_id) = winner {
            sqlx::query("UPDATE guild_wars SET winner_guild_id = $2 WHERE war_id = $1")
                .bind(war.war_id)
                .bind(winner_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE guilds SET treasury = treasury + $2 WHERE guild_id = $1")
                .bind(winner_id)
                .bind(GUILD_WAR_PRIZE)
                .execute(&mut *tx)
                .await?;
            tracing::info!(target: "guilds.war", war_id = war.war_id, winner_id, "war settled");
        }

        tx.commit().await?;
    }
    Ok(())
}

/// Credits war points (arena wins, dungeon clears) to whichever active
/// war the character's guild is fighting, and bumps the member's
/// contribution ledger. No-op outside a war window or outside a guild.
pub async fn add_war_points(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    points: i32,
) -> Result<(), sqlx::Error> {
    let membership = sqlx::query_as::<_, (i64,)>(
        "SELECT guild_id FROM guild_members WHERE character_id = $1",
    )
    .bind(character_id)
    .fetch_optional(&mut **tx)
    .await?;
    let Some((guild_id,)) = membership else {
        return Ok(());
    };

    let updated = sqlx::query(
        "UPDATE guild_wars SET
             challenger_score = challenger_score + CASE WHEN challenger_guild_id = $1 THEN $2 ELSE 0 END,
             defender_score   = defender_score   + CASE WHEN defender_guild_id   = $1 THEN $2 ELSE 0 END
         WHERE status = 'active' AND starts_at <= NOW() AND NOW() < ends_at
           AND (challenger_guild_id = $1 OR defender_guild_id = $1)",
    )
    .bind(guild_id)
    .bind(points)
    .execute(&mut **tx)
    .await?;

    if updated.rows_affected() > 0 {
        sqlx::query(
            "UPDATE guild_members SET contribution = contribution + $2 WHERE character_id = $1",
        )
        .bind(character_id)
        .bind(points as i64)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
