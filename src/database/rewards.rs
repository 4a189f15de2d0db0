//! Contains the daily login reward. Claiming is idempotent per UTC
//! calendar day, enforced in SQL rather than application memory.

use sqlx::PgPool;

use super::economy::add_gold;
use crate::constants::{DAILY_BASE_GOLD, DAILY_STREAK_CAP};

/// What a successful daily claim paid out.
#[derive(Debug)]
pub struct DailyReward {
    pub gold: i64,
    pub streak: i32,
}

/// A transaction to claim the daily reward. A repeat claim on the same
/// calendar day fails; a claim after a missed day resets the streak.
pub async fn claim_daily(pool: &PgPool, character_id: i64) -> Result<DailyReward, String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let previous = sqlx::query_as::<_, (i32, bool, bool)>(
        "SELECT streak,
                date_trunc('day', last_claimed_at) = date_trunc('day', NOW()) AS claimed_today,
                date_trunc('day', last_claimed_at) = date_trunc('day', NOW() - INTERVAL '1 day') AS claimed_yesterday
         FROM daily_claims WHERE character_id = $1 FOR UPDATE",
    )
    .bind(character_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;

    let streak = match previous {
        Some((_, true, _)) => {
            tx.rollback().await.ok();
            return Err("You already claimed today's reward.".to_string());
        }
        Some((streak, false, true)) => (streak + 1).min(DAILY_STREAK_CAP),
        // First ever claim, or the streak lapsed.
        _ => 1,
    };

    let gold = DAILY_BASE_GOLD * streak as i64;

    sqlx::query(
        "INSERT INTO daily_claims (character_id, last_claimed_at, streak) VALUES ($1, NOW(), $2)
         ON CONFLICT (character_id) DO UPDATE SET last_claimed_at = NOW(), streak = EXCLUDED.streak",
    )
    .bind(character_id)
    .bind(streak)
    .execute(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;

    if add_gold(&mut tx, character_id, gold).await.is_err() {
        tx.rollback().await.ok();
        return Err("Failed to pay the daily reward.".to_string());
    }

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;

    tracing::info!(target: "rewards.daily", character_id, gold, streak, "daily reward claimed");
    Ok(DailyReward { gold, streak })
}
