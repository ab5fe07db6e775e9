//! Health check endpoint for container orchestration.
//!
//! Verifies the process is alive and that it can complete a round trip to the
//! database. Used by Kubernetes, ECS, systemd and load balancers as a readiness
//! probe: 200 `OK` when healthy, 500 with a short reason otherwise.

use axum::{
    extract::{RawQuery, State},
    response::Redirect,
};
use tracing::instrument;

use crate::config::HEALTH_PATH;
use crate::health::{probe, HealthResult};
use crate::state::AppState;

/// Health check handler.
///
/// Probes the database on every call. Database failures become a 500 response;
/// they never escape the handler.
#[instrument(name = "health::check", skip(state))]
pub async fn check(State(state): State<AppState>) -> HealthResult {
    probe(state.db.as_ref(), state.probe_timeout()).await
}

/// Redirect `/health` to the canonical `/health/`, keeping the query string.
pub async fn append_slash(RawQuery(query): RawQuery) -> Redirect {
    match query {
        Some(q) => Redirect::permanent(&format!("{}?{}", HEALTH_PATH, q)),
        None => Redirect::permanent(HEALTH_PATH),
    }
}
