//! Database access for the bookstore `PostgreSQL` schema.
//!
//! # Tables
//!
//! - `Book` (with `Author`, `Category`, `Publisher`)
//! - `Customer_Online`
//! - `User_Account`
//! - `Wishlist` - one per customer
//! - `Wishlist_Item` - book + quantity on a wishlist
//!
//! # Views
//!
//! - `Info_Book` - books joined with author, category and publisher
//! - `Wihslist_Customer` - wishlist items joined with customer and book
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/`, are embedded as
//! [`MIGRATOR`] and are run via:
//! ```bash
//! cargo run -p bookstore-cli -- migrate
//! ```
//!
//! # Transactions
//!
//! Check-then-write operations run inside [`begin_serializable`] transactions
//! and are retried by [`retry_on_conflict`] when Postgres aborts them with a
//! serialization failure. [`finish`] ends every transaction with exactly one
//! `COMMIT` or `ROLLBACK`; the pooled connection goes back to the pool when
//! the transaction is dropped.

pub mod accounts;
pub mod books;
pub mod customers;
pub mod wishlists;

use std::future::Future;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Embedded migrations from `crates/server/migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Attempts made for a transaction that keeps hitting serialization failures.
pub const MAX_TRANSACTION_ATTEMPTS: u32 = 3;

/// `serialization_failure`
const SQLSTATE_SERIALIZATION_FAILURE: &str = "40001";
/// `deadlock_detected`
const SQLSTATE_DEADLOCK_DETECTED: &str = "40P01";

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The transaction lost a race with a concurrent one and was aborted.
    #[error("transaction aborted by concurrent update: {0}")]
    SerializationFailure(sqlx::Error),

    /// Requested row was not found.
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        let retryable = matches!(
            &err,
            sqlx::Error::Database(db_err)
                if db_err.code().is_some_and(|code| {
                    code == SQLSTATE_SERIALIZATION_FAILURE || code == SQLSTATE_DEADLOCK_DETECTED
                })
        );

        if retryable {
            Self::SerializationFailure(err)
        } else {
            Self::Database(err)
        }
    }
}

/// Errors that may carry a retryable serialization failure.
pub trait Retryable {
    /// Whether re-running the whole transaction may succeed.
    fn is_retryable(&self) -> bool;
}

impl Retryable for RepositoryError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::SerializationFailure(_))
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the options are invalid or the first connection
/// cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(config.connect_options()?)
        .await
}

/// Begin a transaction at `SERIALIZABLE` isolation.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a connection cannot be acquired or
/// the isolation level cannot be set.
pub async fn begin_serializable(
    pool: &PgPool,
) -> Result<Transaction<'static, Postgres>, RepositoryError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// End a transaction according to `outcome`.
///
/// Commits on `Ok`. On `Err` issues an explicit `ROLLBACK` and returns the
/// original error; a failed rollback is only logged since the connection
/// discards the transaction when it returns to the pool anyway.
///
/// # Errors
///
/// Returns the outcome's error, or the commit error.
pub async fn finish<T, E>(tx: Transaction<'_, Postgres>, outcome: Result<T, E>) -> Result<T, E>
where
    E: From<RepositoryError>,
{
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| E::from(RepositoryError::from(e)))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

/// Run `attempt` until it succeeds, fails with a non-retryable error, or
/// [`MAX_TRANSACTION_ATTEMPTS`] is reached.
///
/// `attempt` must run a complete transaction so that each retry starts fresh.
///
/// # Errors
///
/// Returns the last error produced by `attempt`.
pub async fn retry_on_conflict<T, E, F, Fut>(operation: &'static str, mut attempt: F) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut tries = 1;
    loop {
        match attempt().await {
            Err(err) if err.is_retryable() && tries < MAX_TRANSACTION_ATTEMPTS => {
                tracing::warn!(operation, attempt = tries, error = %err, "Retrying transaction");
                tries += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug)]
    struct Flaky(bool);

    impl std::fmt::Display for Flaky {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "flaky({})", self.0)
        }
    }

    impl Retryable for Flaky {
        fn is_retryable(&self) -> bool {
            self.0
        }
    }

    #[tokio::test]
    async fn test_retry_stops_after_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = retry_on_conflict("test", move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n == 0 { Err(Flaky(true)) } else { Ok(n) }
        })
        .await;

        assert!(matches!(result, Ok(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), Flaky> = retry_on_conflict("test", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(Flaky(true))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_TRANSACTION_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_retry_does_not_repeat_permanent_errors() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), Flaky> = retry_on_conflict("test", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(Flaky(false))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_database_errors_are_not_retryable() {
        let err = RepositoryError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Database(_)));
        assert!(!err.is_retryable());
    }
}
