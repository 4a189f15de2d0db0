//! Leaderboard pages, cached briefly since every lobby renders them.

use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};

use super::error::ApiError;
use crate::constants::{LEADERBOARD_CACHE_TTL_SECS, LEADERBOARD_SIZE};
use crate::database;
use crate::database::models::LeaderboardEntry;
use crate::model::AppState;
use crate::services::cache;

pub async fn show(
    State(state): State<AppState>,
    Path(board): Path<String>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let key = match board.as_str() {
        "level" => "level",
        "arena" => "arena",
        other => {
            return Err(ApiError::Domain(format!(
                "'{}' is not a leaderboard.",
                other
            )));
        }
    };

    let ttl = Duration::from_secs(LEADERBOARD_CACHE_TTL_SECS);
    if let Some(cached) = cache::get_with_ttl(&state.leaderboard_cache, &key, ttl).await {
        return Ok(Json(cached));
    }

    let entries = match key {
        "level" => database::leaderboard::get_level_leaderboard(&state.db, LEADERBOARD_SIZE).await?,
        _ => database::leaderboard::get_arena_leaderboard(&state.db, LEADERBOARD_SIZE).await?,
    };
    cache::insert(&state.leaderboard_cache, key, entries.clone()).await;
    Ok(Json(entries))
}
