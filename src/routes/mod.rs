//! HTTP route handlers.
//!
//! The route table is explicit: the install page at `/` and the database
//! health check at `/health/`, each with its own Cache-Control header.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod home;

use axum::{
    http::header::{HeaderValue, CACHE_CONTROL},
    middleware,
    routing::{any, get},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{
    CACHE_CONTROL_HEALTH, CACHE_CONTROL_HOME, HEALTH_PATH, HEALTH_PATH_NO_SLASH, ROOT_PATH,
};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    // Install page - constant, any method
    let home_routes = Router::new().route(ROOT_PATH, any(home::index)).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HOME),
        ),
    );

    // Health check - no caching, every request re-probes, any method
    let health_routes = Router::new()
        .route(HEALTH_PATH, any(health::check))
        .route(HEALTH_PATH_NO_SLASH, get(health::append_slash))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    Router::new()
        .merge(home_routes)
        .merge(health_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
