//! Dungeon runs: enter, fight floor by floor, abandon.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use super::DropView;
use super::error::ApiError;
use super::extract::CharacterId;
use crate::database;
use crate::database::models::{Dungeon, DungeonRun};
use crate::model::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Dungeon>>, ApiError> {
    Ok(Json(database::dungeons::list_dungeons(&state.db).await?))
}

pub async fn active_run(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<Option<DungeonRun>>, ApiError> {
    Ok(Json(
        database::dungeons::get_active_run(&state.db, character_id).await?,
    ))
}

pub async fn enter(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(dungeon_id): Path<i32>,
) -> Result<Json<DungeonRun>, ApiError> {
    let run = database::dungeons::enter_dungeon(&state.db, character_id, dungeon_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(run))
}

#[derive(Serialize)]
pub struct DungeonRewardsView {
    pub gold: i64,
    pub xp: i64,
    pub new_level: i32,
    pub did_level_up: bool,
    pub drops: Vec<DropView>,
}

#[derive(Serialize)]
pub struct FloorFightResponse {
    pub floor: i32,
    pub victory: bool,
    pub battle_log: Vec<String>,
    pub cleared: bool,
    pub rewards: Option<DungeonRewardsView>,
}

pub async fn fight(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<FloorFightResponse>, ApiError> {
    let outcome = database::dungeons::advance_floor(&state.db, character_id)
        .await
        .map_err(ApiError::Domain)?;
    let cleared = outcome.rewards.is_some();
    Ok(Json(FloorFightResponse {
        floor: outcome.floor,
        victory: outcome.victory,
        battle_log: outcome.battle_log,
        cleared,
        rewards: outcome.rewards.map(|r| DungeonRewardsView {
            gold: r.gold,
            xp: r.xp,
            new_level: r.new_level,
            did_level_up: r.did_level_up,
            drops: r.drops.into_iter().map(DropView::from).collect(),
        }),
    }))
}

pub async fn abandon(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<serde_json::Value>, ApiError> {
    database::dungeons::abandon_run(&state.db, character_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(serde_json::json!({ "abandoned": true })))
}
