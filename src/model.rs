//! This module defines the shared application state handed to every
//! request handler.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::database::models::LeaderboardEntry;
use crate::payments::PixIssuer;

type LeaderboardCache = HashMap<&'static str, (Instant, Vec<LeaderboardEntry>)>;

/// The central, shared state of the application. Cheap to clone; every
/// field is a handle.
#[derive(Clone)]
pub struct AppState {
    /// The connection pool for the PostgreSQL database.
    pub db: PgPool,
    /// The PIX charge issuer behind the VIP shop.
    pub pix: Arc<dyn PixIssuer>,
    /// Cached leaderboard pages keyed by board name, with TTL.
    pub leaderboard_cache: Arc<RwLock<LeaderboardCache>>,
}

impl AppState {
    pub fn new(db: PgPool, pix: Arc<dyn PixIssuer>) -> Self {
        AppState {
            db,
            pix,
            leaderboard_cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
