//! Character creation, the profile page, and inventory listings.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::extract::CharacterId;
use super::{DropView, material_view};
use crate::database;
use crate::database::models::Character;
use crate::items::Item;
use crate::model::AppState;

#[derive(Deserialize)]
pub struct CreateCharacterRequest {
    pub name: String,
    pub class: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCharacterRequest>,
) -> Result<Json<Character>, ApiError> {
    let character = database::characters::create_character(&state.db, &req.name, &req.class)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(character))
}

pub async fn me(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<Character>, ApiError> {
    let character = database::characters::get_character_refreshed(&state.db, character_id).await?;
    Ok(Json(character))
}

#[derive(Serialize)]
pub struct InventoryItemView {
    pub item_id: i32,
    pub name: &'static str,
    pub quantity: i64,
}

pub async fn inventory(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<Vec<InventoryItemView>>, ApiError> {
    let entries = database::economy::get_inventory(&state.db, character_id).await?;
    let items = entries
        .into_iter()
        .map(|entry| InventoryItemView {
            item_id: entry.item_id,
            name: Item::from_i32(entry.item_id).map_or("Unknown Item", |i| i.display_name()),
            quantity: entry.quantity,
        })
        .collect();
    Ok(Json(items))
}

pub async fn materials(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<Vec<DropView>>, ApiError> {
    let entries = database::economy::get_materials(&state.db, character_id).await?;
    let materials = entries
        .into_iter()
        .map(|entry| material_view(entry.material_id, entry.quantity))
        .collect();
    Ok(Json(materials))
}

pub async fn drink_tonic(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<Character>, ApiError> {
    let character = database::characters::use_energy_tonic(&state.db, character_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(character))
}
