//! PostgreSQL directory store.
//!
//! ## Error mapping
//!
//! | SQLx error | Code | `StoreError` |
//! |---|---|---|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (foreign key violation) | `23503` | `NotFound` |
//! | Database (other) | any | `Backend` |
//! | PoolClosed, IO, TLS, decode | n/a | `Backend` |
//!
//! ## Owner scope
//!
//! Every department and employee query carries `user_id` in its `WHERE`
//! clause. Employee writes only succeed when the referenced department has
//! the same owner.

mod departments;
mod employees;
mod users;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use workforce_directory::{StoreError, StoreResult};

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

/// Shared-pool store implementing every directory port.
#[derive(Debug, Clone)]
pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a bounded pool.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        info!(max_connections, "postgres pool ready");
        Ok(Self::new(pool))
    }

    /// Apply the schema. Statements are idempotent.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("23503") => StoreError::NotFound(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {operation}")),
        sqlx::Error::PoolTimedOut => StoreError::Backend(format!("connection pool timed out in {operation}")),
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

/// Rewrite the cause of a classified error, keeping its kind.
pub(crate) fn with_cause(err: StoreError, cause: &str) -> StoreError {
    match err {
        StoreError::Conflict(_) => StoreError::Conflict(cause.to_string()),
        StoreError::NotFound(_) => StoreError::NotFound(cause.to_string()),
        backend @ StoreError::Backend(_) => backend,
    }
}

/// Escape `LIKE` metacharacters so filter text matches literally under `ESCAPE '\'`.
pub(crate) fn like_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn decode_error(operation: &str, err: impl core::fmt::Display) -> StoreError {
    StoreError::Backend(format!("decode error in {operation}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_literal("Engineering"), "Engineering");
        assert_eq!(like_literal("_"), "\\_");
        assert_eq!(like_literal("50%"), "50\\%");
        assert_eq!(like_literal(r"a\b"), r"a\\b");
    }

    #[test]
    fn classified_causes_are_rewritten() {
        let err = with_cause(StoreError::NotFound("fk".into()), "department not found");
        assert_eq!(err, StoreError::NotFound("department not found".into()));

        let backend = with_cause(StoreError::Backend("io".into()), "ignored");
        assert_eq!(backend, StoreError::Backend("io".into()));
    }
}
