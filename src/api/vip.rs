//! The VIP shop: catalog, PIX checkout, the gateway webhook, equipping.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::extract::CharacterId;
use crate::database;
use crate::database::models::{VipClothing, VipPurchase};
use crate::database::vip::WebhookOutcome;
use crate::model::AppState;

pub async fn catalog(State(state): State<AppState>) -> Result<Json<Vec<VipClothing>>, ApiError> {
    Ok(Json(database::vip::list_catalog(&state.db).await?))
}

pub async fn owned(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<Vec<VipClothing>>, ApiError> {
    Ok(Json(
        database::vip::owned_clothing(&state.db, character_id).await?,
    ))
}

pub async fn purchases(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<Vec<VipPurchase>>, ApiError> {
    Ok(Json(
        database::vip::purchase_history(&state.db, character_id).await?,
    ))
}

#[derive(Serialize)]
pub struct CreatePixResponse {
    pub txid: String,
    pub copy_paste: String,
    pub amount_cents: i32,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn create_pix(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(clothing_id): Path<i32>,
) -> Result<Json<CreatePixResponse>, ApiError> {
    let (purchase, charge) =
        database::vip::create_pix_purchase(&state.db, state.pix.as_ref(), character_id, clothing_id)
            .await
            .map_err(ApiError::Domain)?;
    Ok(Json(CreatePixResponse {
        txid: charge.txid,
        copy_paste: charge.copy_paste,
        amount_cents: purchase.amount_cents,
        expires_at: purchase.expires_at,
    }))
}

/// Payload the payment gateway posts back. `status` is the gateway's
/// terminal state for the charge.
#[derive(Deserialize)]
pub struct PixWebhookRequest {
    pub txid: String,
    pub status: String,
}

pub async fn pix_webhook(
    State(state): State<AppState>,
    Json(req): Json<PixWebhookRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let paid = matches!(req.status.as_str(), "paid" | "approved" | "confirmed");
    let outcome = database::vip::apply_webhook(&state.db, &req.txid, paid)
        .await
        .map_err(ApiError::Domain)?;
    let label = match outcome {
        WebhookOutcome::Granted => "granted",
        WebhookOutcome::AlreadyProcessed => "already_processed",
        WebhookOutcome::Expired => "expired",
        WebhookOutcome::Cancelled => "cancelled",
    };
    Ok(Json(serde_json::json!({ "outcome": label })))
}

pub async fn equip(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(clothing_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    database::vip::equip_clothing(&state.db, character_id, clothing_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(serde_json::json!({ "equipped": clothing_id })))
}

pub async fn unequip(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
) -> Result<Json<serde_json::Value>, ApiError> {
    database::vip::unequip_clothing(&state.db, character_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(serde_json::json!({ "equipped": null })))
}
