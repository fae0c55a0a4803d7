//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::config::ReviewsConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ReviewsConfig,
    pool: SqlitePool,
    jwt: JwtService,
}

impl AppState {
    /// Create a new application state. Derives the JWT keys from the
    /// configured secret.
    #[must_use]
    pub fn new(config: ReviewsConfig, pool: SqlitePool) -> Self {
        let jwt = JwtService::new(&config);
        Self {
            inner: Arc::new(AppStateInner { config, pool, jwt }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &ReviewsConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn jwt(&self) -> &JwtService {
        &self.inner.jwt
    }
}
