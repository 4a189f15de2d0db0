//! This module acts as a central hub for all database-related logic.
//! It declares the specialized submodules so they can be accessed from
//! elsewhere in the application via their full path, e.g., `database::missions::start_mission`.

pub mod arena;
pub mod characters;
pub mod chat;
pub mod crafting;
pub mod dungeons;
pub mod economy;
pub mod guilds;
pub mod init;
pub mod leaderboard;
pub mod missions;
pub mod models;
pub mod pets;
pub mod rewards;
pub mod vip;
