//! Database round-trip probe.
//!
//! Issues `SELECT 1`, expects a value numerically equal to `1` in the first column of
//! the first row, and turns every other outcome into an unhealthy result. Each
//! call probes afresh; nothing is cached between requests.

use std::time::{Duration, Instant};

use axum::{
    http::{header::CACHE_CONTROL, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::{CACHE_CONTROL_HEALTH, HEALTH_OK_BODY, PROBE_QUERY};
use crate::db::{Database, Row};
use crate::error::{DbError, HealthError};

/// Outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthResult {
    Healthy,
    Unhealthy(HealthError),
}

impl HealthResult {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthResult::Healthy)
    }
}

impl IntoResponse for HealthResult {
    fn into_response(self) -> Response {
        match self {
            HealthResult::Healthy => (
                StatusCode::OK,
                [(CACHE_CONTROL, CACHE_CONTROL_HEALTH)],
                HEALTH_OK_BODY,
            )
                .into_response(),
            HealthResult::Unhealthy(err) => err.into_response(),
        }
    }
}

/// Run the probe against `db`, giving up after `timeout`.
pub async fn probe(db: &dyn Database, timeout: Duration) -> HealthResult {
    let started = Instant::now();

    let result = match tokio::time::timeout(timeout, db.fetch_row(PROBE_QUERY)).await {
        Ok(Ok(row)) => check_row(row),
        Ok(Err(err)) => Err(HealthError::Database(err)),
        Err(_) => Err(HealthError::Database(DbError::Timeout)),
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(()) => {
            tracing::debug!(elapsed_ms, "Database probe passed");
            HealthResult::Healthy
        }
        Err(err) => {
            tracing::warn!(reason = %err.reason(), elapsed_ms, "Database probe failed");
            HealthResult::Unhealthy(err)
        }
    }
}

/// A missing row counts as an unexpected result, not a driver error.
fn check_row(row: Option<Row>) -> Result<(), HealthError> {
    let row = row.ok_or_else(|| HealthError::UnexpectedResult("query returned no rows".into()))?;

    match row.first() {
        Some(value) if value.is_one() => Ok(()),
        Some(other) => Err(HealthError::UnexpectedResult(format!(
            "expected 1, got {}",
            other
        ))),
        None => Err(HealthError::UnexpectedResult(
            "row has no columns".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Value;
    use async_trait::async_trait;

    struct Fixed(Result<Option<Row>, DbError>);

    #[async_trait]
    impl Database for Fixed {
        async fn fetch_row(&self, sql: &str) -> Result<Option<Row>, DbError> {
            assert_eq!(sql, "SELECT 1");
            self.0.clone()
        }
    }

    struct Hangs;

    #[async_trait]
    impl Database for Hangs {
        async fn fetch_row(&self, _sql: &str) -> Result<Option<Row>, DbError> {
            std::future::pending::<Result<Option<Row>, DbError>>().await
        }
    }

    async fn run(db: Fixed) -> HealthResult {
        probe(&db, Duration::from_secs(5)).await
    }

    #[tokio::test]
    async fn test_one_is_healthy() {
        let result = run(Fixed(Ok(Some(vec![Value::Int(1)])))).await;
        assert_eq!(result, HealthResult::Healthy);
    }

    #[tokio::test]
    async fn test_extra_columns_are_ignored() {
        let result = run(Fixed(Ok(Some(vec![Value::Int(1), Value::Null])))).await;
        assert!(result.is_healthy());
    }

    #[tokio::test]
    async fn test_other_values_are_unexpected() {
        for value in [
            Value::Int(0),
            Value::Int(2),
            Value::Null,
            Value::Float(2.0),
            Value::Bool(false),
            Value::Text("1".into()),
            Value::Other("NUMERIC".into()),
        ] {
            let result = run(Fixed(Ok(Some(vec![value.clone()])))).await;
            assert!(
                matches!(result, HealthResult::Unhealthy(HealthError::UnexpectedResult(_))),
                "value {value} should be unexpected"
            );
        }
    }

    #[tokio::test]
    async fn test_float_and_bool_one_are_healthy() {
        for value in [Value::Float(1.0), Value::Bool(true)] {
            let result = run(Fixed(Ok(Some(vec![value.clone()])))).await;
            assert!(result.is_healthy(), "value {value} should be healthy");
        }
    }

    #[tokio::test]
    async fn test_undecoded_type_reports_check_failed() {
        let result = run(Fixed(Ok(Some(vec![Value::Other("NUMERIC".into())])))).await;
        let HealthResult::Unhealthy(err) = result else {
            panic!("undecoded column must not pass");
        };
        assert_eq!(err.body(), "Database check failed");
    }

    #[tokio::test]
    async fn test_no_row_is_unexpected() {
        let result = run(Fixed(Ok(None))).await;
        assert_eq!(
            result,
            HealthResult::Unhealthy(HealthError::UnexpectedResult(
                "query returned no rows".into()
            ))
        );
    }

    #[tokio::test]
    async fn test_empty_row_is_unexpected() {
        let result = run(Fixed(Ok(Some(vec![])))).await;
        assert!(matches!(
            result,
            HealthResult::Unhealthy(HealthError::UnexpectedResult(_))
        ));
    }

    #[tokio::test]
    async fn test_driver_error_is_passed_through() {
        let err = DbError::Connection("connection refused".into());
        let result = run(Fixed(Err(err.clone()))).await;
        assert_eq!(result, HealthResult::Unhealthy(HealthError::Database(err)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_database_times_out() {
        let result = probe(&Hangs, Duration::from_secs(5)).await;
        assert_eq!(
            result,
            HealthResult::Unhealthy(HealthError::Database(DbError::Timeout))
        );
    }

    #[test]
    fn test_healthy_response() {
        let response = HealthResult::Healthy.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_CONTROL], "no-store");
    }
}
