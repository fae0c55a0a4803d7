//! Ledger primitives over the local customers and goods tables.
//!
//! Every function takes a `&mut SqliteConnection` so the sale service can run
//! them inside one transaction. The conditional writes fuse their precondition
//! with the update; a zero `rows_affected` tells the caller the precondition
//! no longer holds.

use sqlx::SqliteConnection;

use super::RepositoryError;

/// Fetch a customer's wallet balance in cents. `None` if the customer has no
/// local row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn fetch_wallet_balance(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<i64>, RepositoryError> {
    let balance = sqlx::query_scalar::<_, i64>(
        "SELECT wallet_balance_cents FROM customers WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(conn)
    .await?;

    Ok(balance)
}

/// Price and stock for a local good row.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct GoodQuote {
    pub price_cents: i64,
    pub stock_count: i64,
}

/// Fetch the price and stock of a good. `None` if the good has no local row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn fetch_good_quote(
    conn: &mut SqliteConnection,
    good_name: &str,
) -> Result<Option<GoodQuote>, RepositoryError> {
    let quote = sqlx::query_as::<_, GoodQuote>(
        "SELECT price_cents, stock_count FROM goods WHERE name = ?",
    )
    .bind(good_name)
    .fetch_optional(conn)
    .await?;

    Ok(quote)
}

/// Debit a wallet only if the balance covers the amount.
///
/// Returns `true` if the debit was applied, `false` if the balance was short
/// or the customer row disappeared.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn debit_wallet_if_sufficient(
    conn: &mut SqliteConnection,
    username: &str,
    cents: i64,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE customers
        SET wallet_balance_cents = wallet_balance_cents - ?
        WHERE username = ? AND wallet_balance_cents >= ?
        ",
    )
    .bind(cents)
    .bind(username)
    .bind(cents)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Decrement a good's stock by one only if a unit is available.
///
/// Returns `true` if the decrement was applied, `false` if the good was out
/// of stock or the row disappeared.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn decrement_stock_if_available(
    conn: &mut SqliteConnection,
    good_name: &str,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE goods
        SET stock_count = stock_count - 1
        WHERE name = ? AND stock_count >= 1
        ",
    )
    .bind(good_name)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
