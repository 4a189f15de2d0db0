//! Drop-table configuration: each (activity, difficulty) pair maps to a
//! profile of gate chance, rarity weights, and trial count.

use std::fmt;
use std::str::FromStr;

/// The activity a loot roll is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Mission,
    Dungeon,
    ArenaNpc,
    ArenaPvp,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Mission => "mission",
            ActivityKind::Dungeon => "dungeon",
            ActivityKind::ArenaNpc => "arena_npc",
            ActivityKind::ArenaPvp => "arena_pvp",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty tier of the activity. `Boss` is used by boss-tier dungeons
/// and top-bracket arena opponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Boss,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Boss => "boss",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "boss" => Ok(Difficulty::Boss),
            _ => Err(()),
        }
    }
}

/// Loot configuration for one (activity, difficulty) pair.
///
/// `rarity_weights` index the five material tiers from common (0) to
/// legendary (4); a zero weight makes the tier unreachable for that pair.
#[derive(Debug, Clone, Copy)]
pub struct DropProfile {
    /// Chance that any single trial yields a drop at all.
    pub drop_chance: f64,
    pub rarity_weights: [u32; 5],
    /// Number of independent drop trials per roll.
    pub max_drops: u32,
}

/// Static drop-table lookup. Tuned so arena PvP pays out slightly better
/// than NPC fights at the same bracket, and boss dungeons are the only
/// reliable source of legendary materials.
pub fn drop_profile(activity: ActivityKind, difficulty: Difficulty) -> DropProfile {
    use ActivityKind::*;
    use Difficulty::*;
    match (activity, difficulty) {
        (Mission, Easy) => DropProfile {
            drop_chance: 0.35,
            rarity_weights: [70, 25, 5, 0, 0],
            max_drops: 1,
        },
        (Mission, Medium) => DropProfile {
            drop_chance: 0.45,
            rarity_weights: [55, 30, 12, 3, 0],
            max_drops: 2,
        },
        (Mission, Hard) => DropProfile {
            drop_chance: 0.55,
            rarity_weights: [40, 35, 18, 6, 1],
            max_drops: 2,
        },
        (Mission, Boss) => DropProfile {
            drop_chance: 0.65,
            rarity_weights: [30, 35, 22, 10, 3],
            max_drops: 3,
        },
        (Dungeon, Easy) => DropProfile {
            drop_chance: 0.50,
            rarity_weights: [60, 28, 10, 2, 0],
            max_drops: 2,
        },
        (Dungeon, Medium) => DropProfile {
            drop_chance: 0.60,
            rarity_weights: [45, 32, 16, 6, 1],
            max_drops: 3,
        },
        (Dungeon, Hard) => DropProfile {
            drop_chance: 0.70,
            rarity_weights: [32, 33, 22, 10, 3],
            max_drops: 3,
        },
        (Dungeon, Boss) => DropProfile {
            drop_chance: 0.85,
            rarity_weights: [20, 30, 28, 15, 7],
            max_drops: 4,
        },
        (ArenaNpc, Easy) => DropProfile {
            drop_chance: 0.25,
            rarity_weights: [75, 20, 5, 0, 0],
            max_drops: 1,
        },
        (ArenaNpc, Medium) => DropProfile {
            drop_chance: 0.35,
            rarity_weights: [60, 28, 10, 2, 0],
            max_drops: 1,
        },
        (ArenaNpc, Hard) => DropProfile {
            drop_chance: 0.45,
            rarity_weights: [45, 32, 17, 5, 1],
            max_drops: 2,
        },
        (ArenaNpc, Boss) => DropProfile {
            drop_chance: 0.55,
            rarity_weights: [35, 32, 21, 9, 3],
            max_drops: 2,
        },
        (ArenaPvp, Easy) => DropProfile {
            drop_chance: 0.30,
            rarity_weights: [70, 23, 7, 0, 0],
            max_drops: 1,
        },
        (ArenaPvp, Medium) => DropProfile {
            drop_chance: 0.40,
            rarity_weights: [55, 30, 12, 3, 0],
            max_drops: 2,
        },
        (ArenaPvp, Hard) => DropProfile {
            drop_chance: 0.50,
            rarity_weights: [40, 33, 19, 7, 1],
            max_drops: 2,
        },
        (ArenaPvp, Boss) => DropProfile {
            drop_chance: 0.60,
            rarity_weights: [30, 33, 23, 10, 4],
            max_drops: 3,
        },
    }
}
