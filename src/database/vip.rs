//! Contains all database functions for the VIP cosmetic shop: the
//! catalog, PIX purchases, webhook confirmation, and equipping.

use sqlx::PgPool;

use super::models::{VipClothing, VipPurchase};
use crate::payments::{PixCharge, PixIssuer};

/// What a webhook delivery did. Deliveries are retried by the gateway,
/// so every variant is safe to receive more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// First confirmation: the cosmetic was granted.
    Granted,
    /// The purchase was already in a terminal state; nothing changed.
    AlreadyProcessed,
    /// Payment confirmed after the charge expired; nothing granted.
    Expired,
    /// The gateway reported the charge as failed or refunded.
    Cancelled,
}

pub async fn list_catalog(pool: &PgPool) -> Result<Vec<VipClothing>, sqlx::Error> {
    sqlx::query_as::<_, VipClothing>("SELECT * FROM vip_clothing ORDER BY price_cents, clothing_id")
        .fetch_all(pool)
        .await
}

/// The cosmetics a character owns.
pub async fn owned_clothing(
    pool: &PgPool,
    character_id: i64,
) -> Result<Vec<VipClothing>, sqlx::Error> {
    sqlx::query_as::<_, VipClothing>(
        "SELECT vc.* FROM vip_clothing vc
         JOIN character_clothing cc ON vc.clothing_id = cc.clothing_id
         WHERE cc.character_id = $1
         ORDER BY cc.acquired_at",
    )
    .bind(character_id)
    .fetch_all(pool)
    .await
}

/// Issues a PIX charge for a cosmetic and records the pending purchase.
/// Refused when the cosmetic is already owned or a pending charge for it
/// is still open.
pub async fn create_pix_purchase(
    pool: &PgPool,
    issuer: &dyn PixIssuer,
    character_id: i64,
    clothing_id: i32,
) -> Result<(VipPurchase, PixCharge), String> {
    let clothing = sqlx::query_as::<_, VipClothing>(
        "SELECT * FROM vip_clothing WHERE clothing_id = $1",
    )
    .bind(clothing_id)
    .fetch_one(pool)
    .await
    .map_err(|_| "That item is not in the VIP catalog.".to_string())?;

    let already_owned: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM character_clothing WHERE character_id = $1 AND clothing_id = $2",
    )
    .bind(character_id)
    .bind(clothing_id)
    .fetch_one(pool)
    .await
    .map_err(|e| e.to_string())?;
    if already_owned > 0 {
        return Err(format!("You already own {}.", clothing.name));
    }

    let pending: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM vip_purchases
         WHERE character_id = $1 AND clothing_id = $2 AND status = 'pending' AND expires_at > NOW()",
    )
    .bind(character_id)
    .bind(clothing_id)
    .fetch_one(pool)
    .await
    .map_err(|e| e.to_string())?;
    if pending > 0 {
        return Err(format!(
            "You already have an open PIX charge for {}. Pay or wait for it to expire.",
            clothing.name
        ));
    }

    let charge = issuer
        .issue(clothing.price_cents as i64, &clothing.name)
        .await
        .map_err(|e| e.to_string())?;

    let purchase = sqlx::query_as::<_, VipPurchase>(
        "INSERT INTO vip_purchases (txid, character_id, clothing_id, amount_cents, expires_at)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(&charge.txid)
    .bind(character_id)
    .bind(clothing_id)
    .bind(clothing.price_cents)
    .bind(charge.expires_at)
    .fetch_one(pool)
    .await
    .map_err(|_| "Failed to record the purchase.".to_string())?;

    tracing::info!(
        target: "vip.pix",
        character_id,
        clothing = %clothing.name,
        txid = %charge.txid,
        amount_cents = clothing.price_cents,
        "pix charge created"
    );
    Ok((purchase, charge))
}

/// Applies a gateway webhook for a txid. Idempotent: the status flip is
/// guarded on the pending state, so a redelivered confirmation grants
/// nothing twice.
pub async fn apply_webhook(
    pool: &PgPool,
    txid: &str,
    paid: bool,
) -> Result<WebhookOutcome, String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let purchase = sqlx::query_as::<_, VipPurchase>(
        "SELECT * FROM vip_purchases WHERE txid = $1 FOR UPDATE",
    )
    .bind(txid)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| e.to_string())?
    .ok_or_else(|| "Unknown txid.".to_string())?;

    if purchase.status != "pending" {
        tx.rollback().await.ok();
        return Ok(WebhookOutcome::AlreadyProcessed);
    }

    if !paid {
        sqlx::query("UPDATE vip_purchases SET status = 'cancelled' WHERE purchase_id = $1")
            .bind(purchase.purchase_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;
        tx.commit()
            .await
            .map_err(|_| "Failed to finalize the transaction.".to_string())?;
        return Ok(WebhookOutcome::Cancelled);
    }

    if chrono::Utc::now() > purchase.expires_at {
        sqlx::query("UPDATE vip_purchases SET status = 'expired' WHERE purchase_id = $1")
            .bind(purchase.purchase_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;
        tx.commit()
            .await
            .map_err(|_| "Failed to finalize the transaction.".to_string())?;
        tracing::warn!(target: "vip.pix", txid, "payment confirmed after expiry");
        return Ok(WebhookOutcome::Expired);
    }

    sqlx::query("UPDATE vip_purchases SET status = 'paid', paid_at = NOW() WHERE purchase_id = $1")
        .bind(purchase.purchase_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| e.to_string())?;
    sqlx::query(
        "INSERT INTO character_clothing (character_id, clothing_id) VALUES ($1, $2)
         ON CONFLICT DO NOTHING",
    )
    .bind(purchase.character_id)
    .bind(purchase.clothing_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| e.to_string())?;

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;

    tracing::info!(
        target: "vip.pix",
        txid,
        character_id = purchase.character_id,
        clothing_id = purchase.clothing_id,
        "payment confirmed, cosmetic granted"
    );
    Ok(WebhookOutcome::Granted)
}

/// Equips an owned cosmetic.
pub async fn equip_clothing(
    pool: &PgPool,
    character_id: i64,
    clothing_id: i32,
) -> Result<(), String> {
    let owned: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM character_clothing WHERE character_id = $1 AND clothing_id = $2",
    )
    .bind(character_id)
    .bind(clothing_id)
    .fetch_one(pool)
    .await
    .map_err(|e| e.to_string())?;
    if owned == 0 {
        return Err("You don't own that cosmetic.".to_string());
    }

    sqlx::query("UPDATE characters SET equipped_clothing_id = $2 WHERE character_id = $1")
        .bind(character_id)
        .bind(clothing_id)
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

/// Removes the equipped cosmetic.
pub async fn unequip_clothing(pool: &PgPool, character_id: i64) -> Result<(), String> {
    sqlx::query("UPDATE characters SET equipped_clothing_id = NULL WHERE character_id = $1")
        .bind(character_id)
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

/// The character's purchase history, newest first.
pub async fn purchase_history(
    pool: &PgPool,
    character_id: i64,
) -> Result<Vec<VipPurchase>, sqlx::Error> {
    sqlx::query_as::<_, VipPurchase>(
        "SELECT * FROM vip_purchases WHERE character_id = $1 ORDER BY created_at DESC",
    )
    .bind(character_id)
    .fetch_all(pool)
    .await
}
