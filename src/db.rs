//! Database collaborator.
//!
//! The health probe talks to the database through the [`Database`] trait so the
//! handler can be exercised against an in-memory double. [`PgDatabase`] is the
//! production implementation backed by an sqlx Postgres pool.

use std::fmt;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column as _, Row as _, TypeInfo as _};

use crate::config::DatabaseConfig;
use crate::error::DbError;

/// A single column value from a probe row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// A column type the probe does not decode, carrying the database type name.
    Other(String),
}

impl Value {
    /// Numeric equality with `1`: `1`, `1.0` and `true` all qualify.
    pub fn is_one(&self) -> bool {
        match self {
            Value::Int(n) => *n == 1,
            Value::Float(f) => *f == 1.0,
            Value::Bool(b) => *b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Other(type_name) => write!(f, "<{}>", type_name),
        }
    }
}

/// An ordered tuple of column values.
pub type Row = Vec<Value>;

/// Connection acquisition plus single-row query execution.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run `sql` on a pooled connection and return its first row, if any.
    ///
    /// The connection is released before this returns, on success and on error.
    async fn fetch_row(&self, sql: &str) -> Result<Option<Row>, DbError>;
}

/// Postgres pool shared by all requests.
#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// Build the pool without connecting. Connections are opened on first use,
    /// so the server starts even while the database is unreachable.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy(&config.url)?;
        Ok(Self { pool })
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn fetch_row(&self, sql: &str) -> Result<Option<Row>, DbError> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query(sql).fetch_optional(&mut *conn).await?;
        Ok(row.as_ref().map(decode_row))
    }
}

fn decode_row(row: &PgRow) -> Row {
    (0..row.len()).map(|index| decode_column(row, index)).collect()
}

/// Decoding never fails: types outside the ones tried here become `Value::Other`
/// so the probe reports a mismatch rather than a driver error.
fn decode_column(row: &PgRow, index: usize) -> Value {
    fn int<T: Into<i64>>(v: Option<T>) -> Value {
        v.map_or(Value::Null, |n| Value::Int(n.into()))
    }

    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return int(v);
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return int(v);
    }
    if let Ok(v) = row.try_get::<Option<i16>, _>(index) {
        return int(v);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v.map_or(Value::Null, Value::Float);
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(index) {
        return v.map_or(Value::Null, |x| Value::Float(x.into()));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v.map_or(Value::Null, Value::Bool);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.map_or(Value::Null, Value::Text);
    }
    Value::Other(row.column(index).type_info().name().to_string())
}
