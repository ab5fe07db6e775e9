//! Error types for the database collaborator and the health probe.
//!
//! `DbError` is what the database layer reports. `HealthError` is what the probe
//! concludes, and it knows how to render itself as the 500 response.

use axum::{
    http::{header::CACHE_CONTROL, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::{CACHE_CONTROL_HEALTH, HEALTH_CHECK_FAILED_BODY, HEALTH_DB_ERROR_PREFIX};

/// Failure reported by the database collaborator.
///
/// The display text is the bare driver message so it can be embedded in the
/// health response body as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DbError {
    /// Cannot reach or authenticate to the database.
    #[error("{0}")]
    Connection(String),

    /// The query failed to execute or its row could not be decoded.
    #[error("{0}")]
    Query(String),

    /// No connection or result within the allowed time.
    #[error("connection timed out")]
    Timeout,
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DbError::Timeout,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DbError::Connection(err.to_string()),
            // SQLSTATE 08xxx connection exceptions, 28xxx authorization failures
            sqlx::Error::Database(ref db)
                if db
                    .code()
                    .is_some_and(|code| code.starts_with("08") || code.starts_with("28")) =>
            {
                DbError::Connection(err.to_string())
            }
            _ => DbError::Query(err.to_string()),
        }
    }
}

/// Why a health probe did not pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthError {
    /// The round trip succeeded but did not return a single `1`.
    #[error("unexpected probe result: {0}")]
    UnexpectedResult(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl HealthError {
    /// Human-readable reason, used in logs.
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Body text of the 500 response.
    pub fn body(&self) -> String {
        match self {
            HealthError::UnexpectedResult(_) => HEALTH_CHECK_FAILED_BODY.to_string(),
            HealthError::Database(err) => format!("{}{}", HEALTH_DB_ERROR_PREFIX, err),
        }
    }
}

impl IntoResponse for HealthError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(CACHE_CONTROL, CACHE_CONTROL_HEALTH)],
            self.body(),
        )
            .into_response()
    }
}
