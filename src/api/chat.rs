//! Social endpoints: channel chat, private messages, presence. Clients
//! poll with a `since` cursor; there is no push channel.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::error::ApiError;
use super::extract::CharacterId;
use crate::database;
use crate::database::models::{ChatMessage, OnlineCharacter, PrivateMessage};
use crate::model::AppState;

#[derive(Deserialize)]
pub struct SinceQuery {
    pub since: Option<i64>,
}

#[derive(Deserialize)]
pub struct MessageBody {
    pub body: String,
}

pub async fn fetch(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(channel): Path<String>,
    Query(query): Query<SinceQuery>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages =
        database::chat::fetch_messages(&state.db, character_id, &channel, query.since)
            .await
            .map_err(ApiError::Domain)?;
    Ok(Json(messages))
}

pub async fn post(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(channel): Path<String>,
    Json(req): Json<MessageBody>,
) -> Result<Json<ChatMessage>, ApiError> {
    let message = database::chat::post_message(&state.db, character_id, &channel, &req.body)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(message))
}

pub async fn conversation(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(other_id): Path<i64>,
    Query(query): Query<SinceQuery>,
) -> Result<Json<Vec<PrivateMessage>>, ApiError> {
    Ok(Json(
        database::chat::conversation(&state.db, character_id, other_id, query.since).await?,
    ))
}

pub async fn send(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(other_id): Path<i64>,
    Json(req): Json<MessageBody>,
) -> Result<Json<PrivateMessage>, ApiError> {
    let message = database::chat::send_private(&state.db, character_id, other_id, &req.body)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(message))
}

pub async fn mark_read(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(other_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let marked = database::chat::mark_conversation_read(&state.db, character_id, other_id).await?;
    Ok(Json(serde_json::json!({ "marked": marked })))
}

pub async fn unread(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<serde_json::Value>, ApiError> {
    let count = database::chat::unread_count(&state.db, character_id).await?;
    Ok(Json(serde_json::json!({ "unread": count })))
}

pub async fn heartbeat(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<serde_json::Value>, ApiError> {
    database::characters::touch_presence(&state.db, character_id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn online(
    State(state): State<AppState>,
) -> Result<Json<Vec<OnlineCharacter>>, ApiError> {
    Ok(Json(database::chat::online_characters(&state.db).await?))
}
