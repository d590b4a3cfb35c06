//! Shared application state handed to every handler.

use crate::{config::Config, db::DbPool};

/// State injected into handlers via axum's `State` extractor.
///
/// Holds no mutable data: the database is the only shared mutable resource
/// in the system, and the pool is internally synchronized.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self { pool, config }
    }
}
