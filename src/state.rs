//! Shared application state for request handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::Database;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the configuration and the database collaborator the health probe runs
/// against. Handlers keep no other state between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<dyn Database>,
}

impl AppState {
    /// Creates a new application state from the given configuration and database.
    pub fn new(config: AppConfig, db: Arc<dyn Database>) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }

    /// Upper bound on a single health probe.
    pub fn probe_timeout(&self) -> Duration {
        self.config.database.probe_timeout()
    }
}
