//! This module contains all database queries related to leaderboards.

use sqlx::PgPool;

use super::models::LeaderboardEntry;

/// Fetches the top characters by level, ties broken by raw experience.
pub async fn get_level_leaderboard(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardEntry>(
        "SELECT character_id, name, class, level, experience, arena_rating
         FROM characters
         ORDER BY level DESC, experience DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Fetches the top characters by arena rating.
pub async fn get_arena_leaderboard(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardEntry>(
        "SELECT character_id, name, class, level, experience, arena_rating
         FROM characters
         ORDER BY arena_rating DESC, level DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
