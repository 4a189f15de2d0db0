//! The crafting bench: recipes with their ingredients, and crafting.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use super::error::ApiError;
use super::extract::CharacterId;
use super::material_view;
use crate::database;
use crate::items::Item;
use crate::model::AppState;

#[derive(Serialize)]
pub struct IngredientView {
    pub material_id: i32,
    pub name: &'static str,
    pub quantity: i32,
}

#[derive(Serialize)]
pub struct RecipeView {
    pub recipe_id: i32,
    pub output_item_id: i32,
    pub output_name: &'static str,
    pub output_quantity: i32,
    pub required_level: i32,
    pub ingredients: Vec<IngredientView>,
}

/// Lists every recipe with its ingredient requirements in one payload,
/// the shape the crafting page renders directly.
pub async fn recipes(State(state): State<AppState>) -> Result<Json<Vec<RecipeView>>, ApiError> {
    let recipes = database::crafting::get_all_recipes(&state.db).await?;
    let mut views = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let ingredients =
            database::crafting::get_ingredients_for_recipe(&state.db, recipe.recipe_id).await?;
        views.push(RecipeView {
            recipe_id: recipe.recipe_id,
            output_item_id: recipe.output_item_id,
            output_name: Item::from_i32(recipe.output_item_id)
                .map_or("Unknown Item", |i| i.display_name()),
            output_quantity: recipe.output_quantity,
            required_level: recipe.required_level,
            ingredients: ingredients
                .into_iter()
                .map(|ing| IngredientView {
                    material_id: ing.material_id,
                    name: material_view(ing.material_id, 0).name,
                    quantity: ing.quantity,
                })
                .collect(),
        });
    }
    Ok(Json(views))
}

#[derive(Serialize)]
pub struct CraftResponse {
    pub item_id: i32,
    pub name: &'static str,
}

pub async fn craft(
    State(state): State<AppState>,
    CharacterId(character_id): CharacterId,
    Path(recipe_id): Path<i32>,
) -> Result<Json<CraftResponse>, ApiError> {
    let item = database::crafting::craft_item(&state.db, character_id, recipe_id)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(CraftResponse {
        item_id: item as i32,
        name: item.display_name(),
    }))
}
