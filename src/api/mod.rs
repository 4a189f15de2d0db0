//! The HTTP surface. Each submodule is one page-level feature of the
//! browser client; handlers stay thin and delegate to `database`.

pub mod arena;
pub mod characters;
pub mod chat;
pub mod crafting;
pub mod dungeons;
pub mod error;
pub mod extract;
pub mod guilds;
pub mod leaderboard;
pub mod missions;
pub mod pets;
pub mod rewards;
pub mod shop;
pub mod vip;

use axum::Router;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::items::Material;
use crate::loot::MaterialDrop;
use crate::model::AppState;

/// A rolled drop as the client sees it.
#[derive(Serialize)]
pub struct DropView {
    pub material_id: i32,
    pub name: &'static str,
    pub tier: &'static str,
    pub quantity: i64,
}

impl From<MaterialDrop> for DropView {
    fn from(drop: MaterialDrop) -> Self {
        let properties = drop.material.properties();
        DropView {
            material_id: drop.material as i32,
            name: properties.display_name,
            tier: properties.tier.as_str(),
            quantity: drop.quantity,
        }
    }
}

/// Looks up a material's display data for inventory listings; unknown
/// ids (from older seasons) degrade to a placeholder.
pub fn material_view(material_id: i32, quantity: i64) -> DropView {
    match Material::from_i32(material_id) {
        Some(material) => DropView::from(MaterialDrop { material, quantity }),
        None => DropView {
            material_id,
            name: "Unknown Material",
            tier: "Common",
            quantity,
        },
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Characters & inventory
        .route("/characters", post(characters::create))
        .route("/characters/me", get(characters::me))
        .route("/characters/me/inventory", get(characters::inventory))
        .route("/characters/me/materials", get(characters::materials))
        .route("/characters/me/tonic", post(characters::drink_tonic))
        // Missions
        .route("/missions", get(missions::list))
        .route("/missions/active", get(missions::active))
        .route("/missions/{mission_id}/start", post(missions::start))
        .route("/missions/complete", post(missions::complete))
        .route("/missions/abandon", post(missions::abandon))
        // Dungeons
        .route("/dungeons", get(dungeons::list))
        .route("/dungeons/run", get(dungeons::active_run))
        .route("/dungeons/{dungeon_id}/enter", post(dungeons::enter))
        .route("/dungeons/fight", post(dungeons::fight))
        .route("/dungeons/abandon", post(dungeons::abandon))
        // Arena
        .route("/arena/npc", post(arena::fight_npc))
        .route("/arena/pvp", post(arena::fight_pvp))
        .route("/arena/history", get(arena::history))
        // Guilds
        .route("/guilds", get(guilds::list).post(guilds::create))
        .route("/guilds/{guild_id}", get(guilds::show))
        .route("/guilds/{guild_id}/members", get(guilds::members))
        .route("/guilds/{guild_id}/join", post(guilds::join))
        .route("/guilds/{guild_id}/wars", get(guilds::wars))
        .route("/guilds/leave", post(guilds::leave))
        .route("/guilds/roles", post(guilds::set_role))
        .route("/guilds/wars", post(guilds::declare_war))
        // Crafting
        .route("/crafting/recipes", get(crafting::recipes))
        .route("/crafting/{recipe_id}", post(crafting::craft))
        // Shop
        .route("/shop", get(shop::stock))
        .route("/shop/buy", post(shop::buy))
        .route("/shop/sell", post(shop::sell))
        .route("/shop/sell-material", post(shop::sell_material))
        // Pets
        .route("/pets/catalog", get(pets::catalog))
        .route("/pets", get(pets::mine))
        .route("/pets/catalog/{pet_id}/adopt", post(pets::adopt))
        .route("/pets/{character_pet_id}/nickname", post(pets::nickname))
        .route("/pets/{character_pet_id}/companion", post(pets::companion))
        .route("/pets/{character_pet_id}/train", post(pets::train))
        .route("/pets/{character_pet_id}/collect", post(pets::collect))
        // Daily reward
        .route("/daily/claim", post(rewards::claim))
        // Social
        .route("/chat/{channel}", get(chat::fetch).post(chat::post))
        .route("/messages/unread", get(chat::unread))
        .route("/messages/{other_id}", get(chat::conversation).post(chat::send))
        .route("/messages/{other_id}/read", post(chat::mark_read))
        .route("/presence/heartbeat", post(chat::heartbeat))
        .route("/presence/online", get(chat::online))
        // VIP
        .route("/vip/catalog", get(vip::catalog))
        .route("/vip/owned", get(vip::owned))
        .route("/vip/purchases", get(vip::purchases))
        .route("/vip/{clothing_id}/create-pix", post(vip::create_pix))
        .route("/vip/{clothing_id}/equip", post(vip::equip))
        .route("/vip/unequip", post(vip::unequip))
        .route("/vip/pix-webhook", post(vip::pix_webhook))
        // Leaderboards
        .route("/leaderboard/{board}", get(leaderboard::show))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
