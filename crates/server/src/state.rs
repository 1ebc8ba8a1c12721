//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::BookstoreConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The pool is created once in `main` and handed
/// in here; handlers borrow connections from it for the span of one request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BookstoreConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: BookstoreConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &BookstoreConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }
}
