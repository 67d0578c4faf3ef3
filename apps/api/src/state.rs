use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::provider::CritiqueProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// The injected model backend. Selected at startup via AI_PROVIDER.
    pub provider: Arc<dyn CritiqueProvider>,
    pub config: Config,
}
