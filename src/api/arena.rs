//! The arena: ladder NPC fights, PvP challenges, match history.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::DropView;
use super::error::ApiError;
use super::extract::CharacterId;
use crate::database;
use crate::database::arena::ArenaOutcome;
use crate::database::models::ArenaMatch;
use crate::model::AppState;

#[derive(Serialize)]
pub struct ArenaFightResponse {
    pub opponent_name: String,
    pub won: bool,
    pub rating_delta: i32,
    pub new_rating: i32,
    pub battle_log: Vec<String>,
    pub drops: Vec<DropView>,
}

impl From<ArenaOutcome> for ArenaFightResponse {
    fn from(outcome: ArenaOutcome) -> Self {
        ArenaFightResponse {
            opponent_name: outcome.opponent_name,
            won: outcome.won,
            rating_delta: outcome.rating_delta,
            new_rating: outcome.new_rating,
            battle_log: outcome.battle_log,
            drops: outcome.drops.into_iter().map(DropView::from).collect(),
        }
    }
}

pub async fn fight_npc(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<ArenaFightResponse>, ApiError> {
    let outcome = database::arena::fight_npc(&state.db, character_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(outcome.into()))
}

#[derive(Deserialize)]
pub struct PvpRequest {
    pub opponent_id: i64,
}

pub async fn fight_pvp(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Json(req): Json<PvpRequest>,
) -> Result<Json<ArenaFightResponse>, ApiError> {
    let outcome = database::arena::fight_pvp(&state.db, character_id, req.opponent_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(outcome.into()))
}

pub async fn history(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<Vec<ArenaMatch>>, ApiError> {
    Ok(Json(
        database::arena::match_history(&state.db, character_id, 20).await?,
    ))
}
