//! Database operations for the sales service.
//!
//! One SQLite database file per service; this one holds three tables:
//!
//! - `sales` - the append-only sale ledger with price snapshots
//! - `customers` - local wallet balances, keyed by username
//! - `goods` - local price and stock counts, keyed by name
//!
//! The customers and goods tables are local to this database: a sale is two
//! updates and an insert on one connection, not a cross-service transaction.
//!
//! The schema is created at startup with `CREATE TABLE IF NOT EXISTS`; there
//! is no migration system.

pub mod ledger;
pub mod sales;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

/// Errors returned by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created on first use; WAL mode and a busy timeout
/// keep concurrent request handlers from tripping over the single writer.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection fails.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create the sales, customers and goods tables if they do not exist yet.
///
/// # Errors
///
/// Returns `sqlx::Error` if a DDL statement fails.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS sales (
            sale_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            customer_username TEXT NOT NULL,
            good_name TEXT NOT NULL,
            sale_date TEXT NOT NULL,
            sale_amount_cents INTEGER NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS customers (
            username TEXT PRIMARY KEY NOT NULL,
            wallet_balance_cents INTEGER NOT NULL DEFAULT 0
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS goods (
            name TEXT PRIMARY KEY NOT NULL,
            price_cents INTEGER NOT NULL,
            stock_count INTEGER NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// In-memory pool for repository tests. A single connection keeps the
/// `:memory:` database alive for the lifetime of the pool.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
