//! Contains all database functions related to the crafting system.

use sqlx::PgPool;

use super::economy::{add_to_inventory, spend_materials};
use super::models::{Recipe, RecipeIngredient};
use crate::items::{Item, Material};

/// Fetches all available crafting recipes from the database.
pub async fn get_all_recipes(pool: &PgPool) -> Result<Vec<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>("SELECT * FROM recipes ORDER BY required_level, recipe_id")
        .fetch_all(pool)
        .await
}

/// Fetches all material ingredients required for a specific recipe.
pub async fn get_ingredients_for_recipe(
    pool: &PgPool,
    recipe_id: i32,
) -> Result<Vec<RecipeIngredient>, sqlx::Error> {
    sqlx::query_as::<_, RecipeIngredient>(
        "SELECT material_id, quantity FROM recipe_ingredients WHERE recipe_id = $1",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
}

/// A transaction to craft an item.
/// Checks the level gate, consumes the materials, and adds the crafted
/// item to the inventory. Returns Ok(output_item) on success or
/// Err(reason_string) on failure.
pub async fn craft_item(pool: &PgPool, character_id: i64, recipe_id: i32) -> Result<Item, String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    // 1. Get the recipe details.
    let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE recipe_id = $1")
        .bind(recipe_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|_| "That recipe does not exist.".to_string())?;

    let output_item =
        Item::from_i32(recipe.output_item_id).ok_or("Invalid output item in recipe.")?;

    let level: i32 =
        sqlx::query_scalar::<_, i32>("SELECT level FROM characters WHERE character_id = $1")
            .bind(character_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|_| "Could not find your character.".to_string())?;
    if level < recipe.required_level {
        tx.rollback().await.ok();
        return Err(format!(
            "You must be level {} to craft {}.",
            recipe.required_level,
            output_item.display_name()
        ));
    }

    let ingredients = sqlx::query_as::<_, RecipeIngredient>(
        "SELECT material_id, quantity FROM recipe_ingredients WHERE recipe_id = $1",
    )
    .bind(recipe_id)
    .fetch_all(&mut *tx)
    .await
    .map_err(|_| "Could not fetch recipe ingredients.".to_string())?;

    // 2. Atomically consume the materials; the guarded update surfaces
    // any shortage as a named message.
    for ingredient in &ingredients {
        let material =
            Material::from_i32(ingredient.material_id).ok_or("Invalid material in recipe.")?;
        if spend_materials(&mut tx, character_id, material, ingredient.quantity as i64)
            .await
            .is_err()
        {
            tx.rollback().await.ok();
            return Err(format!(
                "You don't have enough {}!",
                material.display_name()
            ));
        }
    }

    // 3. Grant the crafted output.
    if add_to_inventory(
        &mut tx,
        character_id,
        output_item,
        recipe.output_quantity as i64,
    )
    .await
    .is_err()
    {
        tx.rollback().await.ok();
        return Err("Failed to add the crafted item to your inventory.".to_string());
    }

    tx.commit()
        .await
        .map_err(|_| "Failed to finalize the transaction.".to_string())?;

    tracing::info!(
        target: "crafting.craft",
        character_id,
        recipe_id,
        output = output_item.display_name(),
        "item crafted"
    );
    Ok(output_item)
}
