//! Experience curves and level-up processing for characters and pets.

const BASE_XP_PER_LEVEL: i64 = 100;

/// Experience required to advance past the given character level.
pub fn xp_for_level(level: i32) -> i64 {
    BASE_XP_PER_LEVEL + (level as i64 * 50)
}

/// Experience required to advance past the given pet level. Pets level
/// on a shallower curve than characters.
pub fn xp_for_pet_level(level: i32) -> i64 {
    60 + (level as i64 * 25)
}

/// Outcome of feeding experience into a level curve.
pub struct LevelUpResult {
    pub new_xp: i64,
    pub new_level: i32,
    /// (attack, defense, health) gained across all level-ups.
    pub stat_gains: (i32, i32, i32),
    pub did_level_up: bool,
}

/// Processes an experience gain for a character, carrying overflow XP
/// across as many level-ups as it funds.
pub fn handle_character_leveling(level: i32, xp: i64, xp_gained: i64) -> LevelUpResult {
    process_curve(level, xp, xp_gained, xp_for_level, (2, 1, 10))
}

/// Pet variant of [`handle_character_leveling`] with smaller stat gains.
pub fn handle_pet_leveling(level: i32, xp: i64, xp_gained: i64) -> LevelUpResult {
    process_curve(level, xp, xp_gained, xp_for_pet_level, (1, 1, 5))
}

fn process_curve(
    level: i32,
    xp: i64,
    xp_gained: i64,
    curve: fn(i32) -> i64,
    gains_per_level: (i32, i32, i32),
) -> LevelUpResult {
    let mut new_xp = xp + xp_gained;
    let mut new_level = level;
    let mut did_level_up = false;
    let mut stat_gains = (0, 0, 0);

    let mut xp_needed = curve(new_level);
    while new_xp >= xp_needed {
        new_xp -= xp_needed;
        new_level += 1;
        did_level_up = true;

        stat_gains.0 += gains_per_level.0;
        stat_gains.1 += gains_per_level.1;
        stat_gains.2 += gains_per_level.2;

        xp_needed = curve(new_level);
    }

    LevelUpResult {
        new_xp,
        new_level,
        stat_gains,
        did_level_up,
    }
}
