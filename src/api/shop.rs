//! The gold shop: stock listing, buying, and selling.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::extract::CharacterId;
use crate::database;
use crate::items::{Item, Material};
use crate::model::AppState;

#[derive(Serialize)]
pub struct ShopEntry {
    pub item_id: i32,
    pub name: &'static str,
    pub description: &'static str,
    pub buy_price: i64,
    pub sell_price: Option<i64>,
}

/// The shop stock comes from the static catalog, not the database.
pub async fn stock() -> Json<Vec<ShopEntry>> {
    let entries = Item::shop_stock()
        .iter()
        .filter_map(|item| {
            let properties = item.properties();
            properties.buy_price.map(|buy_price| ShopEntry {
                item_id: *item as i32,
                name: properties.display_name,
                description: properties.description,
                buy_price,
                sell_price: properties.sell_price,
            })
        })
        .collect();
    Json(entries)
}

#[derive(Deserialize)]
pub struct TradeRequest {
    pub item_id: i32,
    #[serde(default = "one")]
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct MaterialTradeRequest {
    pub material_id: i32,
    #[serde(default = "one")]
    pub quantity: i64,
}

fn one() -> i64 {
    1
}

#[derive(Serialize)]
pub struct TradeResponse {
    pub gold_delta: i64,
}

pub async fn buy(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Json(req): Json<TradeRequest>,
) -> Result<Json<TradeResponse>, ApiError> {
    let item = Item::from_i32(req.item_id)
        .ok_or_else(|| ApiError::Domain("That item does not exist.".to_string()))?;
    let cost = database::economy::buy_item(&state.db, character_id, item, req.quantity)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(TradeResponse { gold_delta: -cost }))
}

pub async fn sell(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Json(req): Json<TradeRequest>,
) -> Result<Json<TradeResponse>, ApiError> {
    let item = Item::from_i32(req.item_id)
        .ok_or_else(|| ApiError::Domain("That item does not exist.".to_string()))?;
    let earnings = database::economy::sell_item(&state.db, character_id, item, req.quantity)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(TradeResponse {
        gold_delta: earnings,
    }))
}

pub async fn sell_material(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Json(req): Json<MaterialTradeRequest>,
) -> Result<Json<TradeResponse>, ApiError> {
    let material = Material::from_i32(req.material_id)
        .ok_or_else(|| ApiError::Domain("That material does not exist.".to_string()))?;
    let earnings =
        database::economy::sell_material(&state.db, character_id, material, req.quantity)
            .await
            .map_err(ApiError::Domain)?;
    Ok(Json(TradeResponse {
        gold_delta: earnings,
    }))
}
