//! Time-based energy regeneration.

use chrono::{Duration, Utc};

use crate::constants::ENERGY_REPLENISH_MINUTES;
use crate::database::models::Character;

/// Calculates the energy a character should have based on how much time
/// has passed since the last stored update.
///
/// Returns `(new_energy, needs_database_update)`.
pub fn calculate_energy_recharge(character: &Character) -> (i32, bool) {
    let now = Utc::now();
    let elapsed = now - character.last_energy_update;

    if elapsed < Duration::minutes(ENERGY_REPLENISH_MINUTES) {
        return (character.energy, false);
    }

    let points_to_add = (elapsed.num_minutes() / ENERGY_REPLENISH_MINUTES) as i32;
    if points_to_add <= 0 {
        return (character.energy, false);
    }

    // Cap at the character's maximum; an over-cap value (e.g. from a
    // tonic) is left untouched rather than clamped down.
    if character.energy >= character.max_energy {
        return (character.energy, false);
    }
    let new_energy = (character.energy + points_to_add).min(character.max_energy);

    (new_energy, new_energy != character.energy)
}
