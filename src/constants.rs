// Central constants for game tuning, caching, and limits.
pub const ENERGY_REPLENISH_MINUTES: i64 = 10; // 1 energy per 10 minutes
pub const MAX_BATTLE_ROUNDS: u32 = 30;
pub const MAX_PET_STABLE: i64 = 10;
pub const GUILD_CREATE_COST: i64 = 500;
pub const GUILD_WAR_DURATION_HOURS: i64 = 24;
pub const GUILD_WAR_PRIZE: i64 = 1000;
pub const ARENA_RATING_K: i32 = 24;
pub const CHAT_PAGE_LIMIT: i64 = 50;
pub const ONLINE_WINDOW_SECS: i64 = 90;
pub const PIX_EXPIRY_MINUTES: i64 = 30;
pub const DAILY_BASE_GOLD: i64 = 50;
pub const DAILY_STREAK_CAP: i32 = 7;
pub const PET_TRAINING_HOURS: i64 = 4;
pub const PET_TRAINING_STAT_GAIN: i32 = 2;
pub const LEADERBOARD_CACHE_TTL_SECS: u64 = 30;
pub const LEADERBOARD_SIZE: i64 = 20;
