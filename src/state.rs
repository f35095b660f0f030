//! Shared application state for all routes. The registry is frozen before the server starts.

use crate::config::ConfigRegistry;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub registry: Arc<ConfigRegistry>,
}

impl AppState {
    pub fn new(pool: PgPool, registry: ConfigRegistry) -> Self {
        AppState {
            pool,
            registry: Arc::new(registry),
        }
    }
}
