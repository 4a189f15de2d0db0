//! Contains all database functions related to the core player economy.
//! This includes gold, item inventories, material stashes, and the shop.

use sqlx::{PgPool, Postgres, Transaction};

use super::models::{InventoryEntry, MaterialEntry};
use crate::items::{Item, Material};
use crate::loot::MaterialDrop;

/// Retrieves a character's entire item inventory.
pub async fn get_inventory(
    pool: &PgPool,
    character_id: i64,
) -> Result<Vec<InventoryEntry>, sqlx::Error> {
    sqlx::query_as::<_, InventoryEntry>(
        "SELECT item_id, quantity FROM inventories WHERE character_id = $1 AND quantity > 0 ORDER BY item_id",
    )
    .bind(character_id)
    .fetch_all(pool)
    .await
}

/// Gets the quantity of a single item within a transaction, locking the row.
pub async fn get_inventory_item(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    item: Item,
) -> Result<Option<InventoryEntry>, sqlx::Error> {
    sqlx::query_as::<_, InventoryEntry>(
        "SELECT item_id, quantity FROM inventories WHERE character_id = $1 AND item_id = $2 FOR UPDATE",
    )
    .bind(character_id)
    .bind(item as i32)
    .fetch_optional(&mut **tx)
    .await
}

/// Adds (or subtracts) gold within an existing transaction.
/// Fails with `RowNotFound` when the balance would go negative.
pub async fn add_gold(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    delta: i64,
) -> Result<(), sqlx::Error> {
    let res = sqlx::query(
        "UPDATE characters SET gold = gold + $2 WHERE character_id = $1 AND gold + $2 >= 0",
    )
    .bind(character_id)
    .bind(delta)
    .execute(&mut **tx)
    .await?;
    if res.rows_affected() == 1 {
        Ok(())
    } else {
        Err(sqlx::Error::RowNotFound)
    }
}

/// Adds (or removes when negative) a quantity of an item to an inventory.
/// Inserts the row on first acquisition; removal is guarded so the stored
/// quantity never goes below zero.
pub async fn add_to_inventory(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    item: Item,
    delta_qty: i64,
) -> Result<(), sqlx::Error> {
    if delta_qty == 0 {
        return Ok(());
    }
    if delta_qty > 0 {
        sqlx::query(
            "INSERT INTO inventories (character_id, item_id, quantity) VALUES ($1, $2, $3)
             ON CONFLICT (character_id, item_id) DO UPDATE SET quantity = inventories.quantity + EXCLUDED.quantity",
        )
        .bind(character_id)
        .bind(item as i32)
        .bind(delta_qty)
        .execute(&mut **tx)
        .await?;
        Ok(())
    } else {
        let res = sqlx::query(
            "UPDATE inventories SET quantity = quantity + $3
             WHERE character_id = $1 AND item_id = $2 AND quantity + $3 >= 0",
        )
        .bind(character_id)
        .bind(item as i32)
        .bind(delta_qty)
        .execute(&mut **tx)
        .await?;
        if res.rows_affected() == 1 {
            Ok(())
        } else {
            Err(sqlx::Error::RowNotFound)
        }
    }
}

/// Retrieves a character's material stash.
pub async fn get_materials(
    pool: &PgPool,
    character_id: i64,
) -> Result<Vec<MaterialEntry>, sqlx::Error> {
    sqlx::query_as::<_, MaterialEntry>(
        "SELECT material_id, quantity FROM character_materials WHERE character_id = $1 AND quantity > 0 ORDER BY material_id",
    )
    .bind(character_id)
    .fetch_all(pool)
    .await
}

/// Persists a batch of rolled drops by upsert-accumulation. The batch is
/// already deduplicated by the loot engine, so each row is touched once.
pub async fn add_materials(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    drops: &[MaterialDrop],
) -> Result<(), sqlx::Error> {
    for drop in drops {
        sqlx::query(
            "INSERT INTO character_materials (character_id, material_id, quantity) VALUES ($1, $2, $3)
             ON CONFLICT (character_id, material_id) DO UPDATE SET quantity = character_materials.quantity + EXCLUDED.quantity",
        )
        .bind(character_id)
        .bind(drop.material as i32)
        .bind(drop.quantity)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Consumes materials (crafting, selling). Guarded against going negative.
pub async fn spend_materials(
    tx: &mut Transaction<'_, Postgres>,
    character_id: i64,
    material: Material,
    quantity: i64,
) -> Result<(), sqlx::Error> {
    let res = sqlx::query(
        "UPDATE character_materials SET quantity = quantity - $3
         WHERE character_id = $1 AND material_id = $2 AND quantity >= $3",
    )
    .bind(character_id)
    .bind(material as i32)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;
    if res.rows_affected() == 1 {
        Ok(())
    } else {
        Err(sqlx::Error::RowNotFound)
    }
}

/// A transaction to buy an item from the shop.
/// The purchase never completes when the character's gold is below the
/// total price. Returns the total cost on success.
pub async fn buy_item(
    pool: &PgPool,
    character_id: i64,
    item: Item,
    quantity: i64,
) -> Result<i64, String> {
    let properties = item.properties();
    let buy_price = properties
        .buy_price
        .ok_or_else(|| format!("'{}' cannot be bought from the shop.", properties.display_name))?;
    if quantity <= 0 {
        return Err("You must buy at least one item.".to_string());
    }
    let total_cost = buy_price * quantity;

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let gold: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT gold FROM characters WHERE character_id = $1 FOR UPDATE",
    )
    .bind(character_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|_| "Could not find your character.".to_string())?;

    if gold < total_cost {
        tx.rollback().await.ok();
        return Err(format!(
            "You cannot afford that! You need {} gold, but you only have {}.",
            total_cost, gold
        ));
    }

    if add_gold(&mut tx, character_id, -total_cost).await.is_err() {
        tx.rollback().await.ok();
        return Err("Failed to deduct gold from your balance.".to_string());
    }
    if add_to_inventory(&mut tx, character_id, item, quantity)
        .await
        .is_err()
    {
        tx.rollback().await.ok();
        return Err("Failed to add the item to your inventory.".to_string());
    }

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;

    tracing::info!(
        target: "economy.shop",
        character_id,
        item = properties.display_name,
        quantity,
        total_cost,
        "shop purchase"
    );
    Ok(total_cost)
}

/// A transaction to sell items back to the shop. Returns gold earned.
pub async fn sell_item(
    pool: &PgPool,
    character_id: i64,
    item: Item,
    quantity: i64,
) -> Result<i64, String> {
    let properties = item.properties();
    if !properties.is_sellable {
        return Err(format!("'{}' cannot be sold.", properties.display_name));
    }
    let sell_price = properties
        .sell_price
        .ok_or_else(|| format!("'{}' has no sale value.", properties.display_name))?;
    if quantity <= 0 {
        return Err("You must sell at least one item.".to_string());
    }

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let owned = get_inventory_item(&mut tx, character_id, item)
        .await
        .map_err(|_| "Could not check your inventory.".to_string())?;
    if owned.is_none_or(|entry| entry.quantity < quantity) {
        tx.rollback().await.ok();
        return Err(format!(
            "You don't have {} x{} to sell.",
            properties.display_name, quantity
        ));
    }

    let earnings = sell_price * quantity;
    if add_to_inventory(&mut tx, character_id, item, -quantity)
        .await
        .is_err()
    {
        tx.rollback().await.ok();
        return Err("Failed to remove the items from your inventory.".to_string());
    }
    if add_gold(&mut tx, character_id, earnings).await.is_err() {
        tx.rollback().await.ok();
        return Err("Failed to credit your gold.".to_string());
    }

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok(earnings)
}

/// A transaction to sell materials from the stash. Returns gold earned.
pub async fn sell_material(
    pool: &PgPool,
    character_id: i64,
    material: Material,
    quantity: i64,
) -> Result<i64, String> {
    if quantity <= 0 {
        return Err("You must sell at least one material.".to_string());
    }
    let properties = material.properties();
    let earnings = properties.sell_price * quantity;

    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    if spend_materials(&mut tx, character_id, material, quantity)
        .await
        .is_err()
    {
        tx.rollback().await.ok();
        return Err(format!(
            "You don't have {} x{} to sell.",
            properties.display_name, quantity
        ));
    }
    if add_gold(&mut tx, character_id, earnings).await.is_err() {
        tx.rollback().await.ok();
        return Err("Failed to credit your gold.".to_string());
    }

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;
    Ok(earnings)
}
