//! Contains all the data structures that map to database tables or query results.

use serde::Serialize;
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Character {
    pub character_id: i64,
    pub name: String,
    pub class: String,
    pub gold: i64,
    pub experience: i64,
    pub level: i32,
    pub energy: i32,
    pub max_energy: i32,
    pub last_energy_update: DateTime<Utc>,
    pub attack: i32,
    pub defense: i32,
    pub health: i32,
    pub arena_rating: i32,
    pub equipped_clothing_id: Option<i32>,
    pub last_seen_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct InventoryEntry {
    pub item_id: i32,
    pub quantity: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct MaterialEntry {
    pub material_id: i32,
    pub quantity: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Mission {
    pub mission_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub min_level: i32,
    pub energy_cost: i32,
    pub duration_minutes: i32,
    pub reward_gold: i64,
    pub reward_xp: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct CharacterMission {
    pub character_mission_id: i64,
    pub character_id: i64,
    pub mission_id: i32,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Dungeon {
    pub dungeon_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub min_level: i32,
    pub energy_cost: i32,
    pub floors: i32,
    pub reward_gold: i64,
    pub reward_xp: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct DungeonFloor {
    pub dungeon_id: i32,
    pub floor: i32,
    pub enemy_name: String,
    pub enemy_attack: i32,
    pub enemy_defense: i32,
    pub enemy_health: i32,
    pub enemy_count: i32,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct DungeonRun {
    pub run_id: i64,
    pub character_id: i64,
    pub dungeon_id: i32,
    pub current_floor: i32,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Guild {
    pub guild_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub leader_id: i64,
    pub treasury: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct GuildMember {
    pub guild_id: i64,
    pub character_id: i64,
    pub role: String,
    pub contribution: i64,
    pub joined_at: DateTime<Utc>,
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct GuildWar {
    pub war_id: i64,
    pub challenger_guild_id: i64,
    pub defender_guild_id: i64,
    pub challenger_score: i32,
    pub defender_score: i32,
    pub status: String,
    pub winner_guild_id: Option<i64>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Recipe {
    pub recipe_id: i32,
    pub output_item_id: i32,
    pub output_quantity: i32,
    pub required_level: i32,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct RecipeIngredient {
    pub material_id: i32,
    pub quantity: i32,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Pet {
    pub pet_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub rarity: String,
    pub base_attack: i32,
    pub base_defense: i32,
    pub base_health: i32,
    pub adopt_cost: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct CharacterPet {
    pub character_pet_id: i64,
    pub character_id: i64,
    pub pet_id: i32,
    pub nickname: Option<String>,
    pub level: i32,
    pub experience: i64,
    pub attack: i32,
    pub defense: i32,
    pub health: i32,
    pub is_companion: bool,
    pub is_training: bool,
    pub training_stat: Option<String>,
    pub training_ends_at: Option<DateTime<Utc>>,
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct DailyClaim {
    pub character_id: i64,
    pub last_claimed_at: DateTime<Utc>,
    pub streak: i32,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct ArenaMatch {
    pub match_id: i64,
    pub character_id: i64,
    pub opponent_kind: String,
    pub opponent_name: String,
    pub opponent_character_id: Option<i64>,
    pub won: bool,
    pub rating_delta: i32,
    pub fought_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub message_id: i64,
    pub channel: String,
    pub guild_id: Option<i64>,
    pub sender_id: i64,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub sender_name: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct PrivateMessage {
    pub message_id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct VipClothing {
    pub clothing_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub slot: String,
    pub price_cents: i32,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct VipPurchase {
    pub purchase_id: i64,
    pub txid: String,
    pub character_id: i64,
    pub clothing_id: i32,
    pub amount_cents: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub character_id: i64,
    pub name: String,
    pub class: String,
    pub level: i32,
    pub experience: i64,
    pub arena_rating: i32,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct OnlineCharacter {
    pub character_id: i64,
    pub name: String,
    pub level: i32,
    pub last_seen_at: DateTime<Utc>,
}
