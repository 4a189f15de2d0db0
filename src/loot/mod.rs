//! The material-drop engine: weighted-random loot keyed by activity and
//! difficulty, with batch deduplication before persistence.

pub mod roll;
pub mod tables;

pub use roll::{MaterialDrop, roll_material_drops, roll_material_drops_with};
pub use tables::{ActivityKind, Difficulty, DropProfile, drop_profile};
