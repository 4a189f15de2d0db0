//! Guild management and guild wars.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use super::error::ApiError;
use super::extract::CharacterId;
use crate::database;
use crate::database::models::{Guild, GuildMember, GuildWar};
use crate::model::AppState;

#[derive(Deserialize)]
pub struct CreateGuildRequest {
    pub name: String,
    pub description: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Json(req): Json<CreateGuildRequest>,
) -> Result<Json<Guild>, ApiError> {
    let guild = database::guilds::create_guild(
        &state.db,
        character_id,
        &req.name,
        req.description.as_deref(),
    )
    .await
    .map_err(ApiError::Domain)?;
    Ok(Json(guild))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Guild>>, ApiError> {
    Ok(Json(database::guilds::list_guilds(&state.db).await?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(guild_id): Path<i64>,
) -> Result<Json<Guild>, ApiError> {
    Ok(Json(database::guilds::get_guild(&state.db, guild_id).await?))
}

pub async fn members(
    State(state): State<AppState>,
    Path(guild_id): Path<i64>,
) -> Result<Json<Vec<GuildMember>>, ApiError> {
    Ok(Json(
        database::guilds::list_members(&state.db, guild_id).await?,
    ))
}

pub async fn join(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(guild_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    database::guilds::join_guild(&state.db, character_id, guild_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(serde_json::json!({ "joined": true })))
}

pub async fn leave(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<serde_json::Value>, ApiError> {
    database::guilds::leave_guild(&state.db, character_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(serde_json::json!({ "left": true })))
}

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub target_id: i64,
    pub role: String,
}

pub async fn set_role(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Json(req): Json<SetRoleRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    database::guilds::set_member_role(&state.db, character_id, req.target_id, &req.role)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(serde_json::json!({ "updated": true })))
}

#[derive(Deserialize)]
pub struct DeclareWarRequest {
    pub defender_guild_id: i64,
}

pub async fn declare_war(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Json(req): Json<DeclareWarRequest>,
) -> Result<Json<GuildWar>, ApiError> {
    let war = database::guilds::declare_war(&state.db, character_id, req.defender_guild_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(war))
}

pub async fn wars(
    State(state): State<AppState>,
    Path(guild_id): Path<i64>,
) -> Result<Json<Vec<GuildWar>>, ApiError> {
    Ok(Json(database::guilds::list_wars(&state.db, guild_id).await?))
}
