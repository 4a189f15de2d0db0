// Library entry so integration tests and external tools can reference internal modules.
// Re-export the same modules used by the binary (`main.rs`).
pub mod api;
pub mod constants;
pub mod database;
pub mod game;
pub mod items;
pub mod loot;
pub mod model;
pub mod payments;
pub mod services;

// Convenient re-exports for frequently used types.
pub use model::AppState;
