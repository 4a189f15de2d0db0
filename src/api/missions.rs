//! The mission board: catalog, start, timed completion, abandon.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use super::DropView;
use super::error::ApiError;
use super::extract::CharacterId;
use crate::database;
use crate::database::models::{CharacterMission, Mission};
use crate::model::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Mission>>, ApiError> {
    Ok(Json(database::missions::list_missions(&state.db).await?))
}

pub async fn active(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<Option<CharacterMission>>, ApiError> {
    Ok(Json(
        database::missions::get_active_mission(&state.db, character_id).await?,
    ))
}

pub async fn start(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(mission_id): Path<i32>,
) -> Result<Json<CharacterMission>, ApiError> {
    let row = database::missions::start_mission(&state.db, character_id, mission_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(row))
}

#[derive(Serialize)]
pub struct MissionCompleteResponse {
    pub mission: Mission,
    pub gold: i64,
    pub xp: i64,
    pub new_level: i32,
    pub did_level_up: bool,
    pub drops: Vec<DropView>,
}

pub async fn complete(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<MissionCompleteResponse>, ApiError> {
    let outcome = database::missions::complete_mission(&state.db, character_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(MissionCompleteResponse {
        mission: outcome.mission,
        gold: outcome.gold,
        xp: outcome.xp,
        new_level: outcome.new_level,
        did_level_up: outcome.did_level_up,
        drops: outcome.drops.into_iter().map(DropView::from).collect(),
    }))
}

pub async fn abandon(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<serde_json::Value>, ApiError> {
    database::missions::abandon_mission(&state.db, character_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(serde_json::json!({ "abandoned": true })))
}
