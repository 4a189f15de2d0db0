//! The daily login reward.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::error::ApiError;
use super::extract::CharacterId;
use crate::database;
use crate::model::AppState;

#[derive(Serialize)]
pub struct DailyClaimResponse {
    pub gold: i64,
    pub streak: i32,
}

pub async fn claim(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<DailyClaimResponse>, ApiError> {
    let reward = database::rewards::claim_daily(&state.db, character_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(DailyClaimResponse {
        gold: reward.gold,
        streak: reward.streak,
    }))
}
