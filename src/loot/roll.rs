//! Rolls material drops against the static drop tables.

use rand::Rng;

use super::tables::{ActivityKind, Difficulty, drop_profile};
use crate::items::{Material, MaterialTier};

/// One rolled drop after batch deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialDrop {
    pub material: Material,
    pub quantity: i64,
}

/// Rolls drops for a finished activity using the thread-local RNG.
///
/// The RNG is created and dropped inside this call so callers in async
/// contexts can hold the result across `.await` points.
pub fn roll_material_drops(activity: ActivityKind, difficulty: Difficulty) -> Vec<MaterialDrop> {
    let mut rng = rand::rng();
    roll_material_drops_with(activity, difficulty, &mut rng)
}

/// Deterministic variant used by the tests; takes the RNG explicitly.
///
/// For up to `max_drops` independent trials: a coin flip against
/// `drop_chance` gates the trial, then a tier is picked by weighted
/// selection and a material uniformly from that tier's pool. Repeated
/// materials accumulate quantity instead of producing duplicate entries.
pub fn roll_material_drops_with<R: Rng>(
    activity: ActivityKind,
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<MaterialDrop> {
    let profile = drop_profile(activity, difficulty);
    let mut drops: Vec<MaterialDrop> = Vec::new();

    for _ in 0..profile.max_drops {
        if !rng.random_bool(profile.drop_chance) {
            continue;
        }
        let tier = pick_tier(&profile.rarity_weights, rng);
        let pool = Material::pool(tier);
        let material = pool[rng.random_range(0..pool.len())];
        let quantity = quantity_for_tier(tier, rng);

        match drops.iter_mut().find(|d| d.material == material) {
            Some(existing) => existing.quantity += quantity,
            None => drops.push(MaterialDrop { material, quantity }),
        }
    }

    tracing::debug!(
        target: "loot.roll",
        activity = %activity,
        difficulty = %difficulty,
        drops = drops.len(),
        "rolled material drops"
    );
    drops
}

/// Weighted selection over the five tiers. Zero-weight tiers are skipped;
/// an all-zero table falls back to common.
fn pick_tier<R: Rng>(weights: &[u32; 5], rng: &mut R) -> MaterialTier {
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return MaterialTier::Common;
    }
    let mut ticket = rng.random_range(0..total);
    for (tier, &weight) in MaterialTier::ALL.iter().zip(weights.iter()) {
        if ticket < weight {
            return *tier;
        }
        ticket -= weight;
    }
    MaterialTier::Common
}

/// Commons come in small handfuls; anything rarer drops one at a time.
fn quantity_for_tier<R: Rng>(tier: MaterialTier, rng: &mut R) -> i64 {
    match tier {
        MaterialTier::Common => rng.random_range(1..=3),
        MaterialTier::Uncommon => rng.random_range(1..=2),
        _ => 1,
    }
}
