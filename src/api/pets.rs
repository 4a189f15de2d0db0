//! The pet stable: adoption, nicknames, companions, and training.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::extract::CharacterId;
use crate::database;
use crate::database::models::{CharacterPet, Pet};
use crate::model::AppState;

pub async fn catalog(State(state): State<AppState>) -> Result<Json<Vec<Pet>>, ApiError> {
    Ok(Json(database::pets::list_catalog(&state.db).await?))
}

pub async fn mine(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<Vec<CharacterPet>>, ApiError> {
    Ok(Json(
        database::pets::get_character_pets(&state.db, character_id).await?,
    ))
}

pub async fn adopt(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(pet_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let name = database::pets::adopt_pet(&state.db, character_id, pet_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(serde_json::json!({ "adopted": name })))
}

#[derive(Deserialize)]
pub struct NicknameRequest {
    pub nickname: String,
}

pub async fn nickname(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(character_pet_id): Path<i64>,
    Json(req): Json<NicknameRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    database::pets::set_nickname(&state.db, character_id, character_pet_id, &req.nickname)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(serde_json::json!({ "renamed": true })))
}

pub async fn companion(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(character_pet_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    database::pets::set_companion(&state.db, character_id, character_pet_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(serde_json::json!({ "companion": character_pet_id })))
}

#[derive(Deserialize)]
pub struct TrainRequest {
    pub stat: String,
}

#[derive(Serialize)]
pub struct TrainResponse {
    pub training_ends_at: chrono::DateTime<chrono::Utc>,
}

pub async fn train(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(character_pet_id): Path<i64>,
    Json(req): Json<TrainRequest>,
) -> Result<Json<TrainResponse>, ApiError> {
    let ends_at =
        database::pets::start_training(&state.db, character_id, character_pet_id, &req.stat)
            .await
            .map_err(ApiError::Domain)?;
    Ok(Json(TrainResponse {
        training_ends_at: ends_at,
    }))
}

#[derive(Serialize)]
pub struct CollectResponse {
    pub stat: String,
    pub gain: i32,
}

pub async fn collect(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(character_pet_id): Path<i64>,
) -> Result<Json<CollectResponse>, ApiError> {
    let (stat, gain) =
        database::pets::collect_training(&state.db, character_id, character_pet_id)
            .await
            .map_err(ApiError::Domain)?;
    Ok(Json(CollectResponse { stat, gain }))
}
