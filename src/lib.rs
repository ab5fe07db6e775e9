//! Pulse: install check and database health endpoint.
//!
//! Serves a constant install-confirmation page at `/` and a readiness probe at
//! `/health/` that performs a `SELECT 1` round trip against the configured
//! database on every request.

pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{DbError, HealthError};
pub use health::HealthResult;
pub use routes::create_router;
pub use state::AppState;
