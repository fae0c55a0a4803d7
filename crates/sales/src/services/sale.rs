//! The sale transaction.
//!
//! A sale is an all-or-nothing unit over the local database: debit the
//! wallet, decrement the stock, append the sale row. All three run inside one
//! sqlx transaction; any storage fault rolls the whole unit back.

use chrono::Utc;
use sqlx::SqlitePool;

use souk_core::Username;

use crate::db::RepositoryError;
use crate::db::ledger::{
    debit_wallet_if_sufficient, decrement_stock_if_available, fetch_good_quote,
    fetch_wallet_balance,
};
use crate::db::sales::insert_sale;

/// Business outcome of a sale attempt.
///
/// `Declined` covers both insufficient funds and insufficient stock; callers
/// that need the distinction read the catalog first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleOutcome {
    /// Wallet debited, stock decremented, sale recorded.
    Success,
    /// Preconditions not met; nothing changed.
    Declined,
    /// No local row for the customer.
    CustomerNotFound,
    /// No local row for the good.
    GoodNotFound,
}

/// Execute a sale of one unit of `good_name` to `customer`.
///
/// The early reads classify missing rows and obvious declines; the
/// conditional writes re-verify their preconditions, so a concurrent sale
/// that wins the race after our read turns into a `Declined`, never a
/// negative balance or stock.
///
/// # Errors
///
/// Returns `RepositoryError` if the transaction cannot be completed; nothing
/// is persisted in that case.
pub async fn execute_sale(
    pool: &SqlitePool,
    customer: &Username,
    good_name: &str,
) -> Result<SaleOutcome, RepositoryError> {
    let mut tx = pool.begin().await?;

    let Some(balance) = fetch_wallet_balance(&mut tx, customer.as_str()).await? else {
        return Ok(SaleOutcome::CustomerNotFound);
    };
    let Some(quote) = fetch_good_quote(&mut tx, good_name).await? else {
        return Ok(SaleOutcome::GoodNotFound);
    };

    if balance < quote.price_cents || quote.stock_count <= 0 {
        return Ok(SaleOutcome::Declined);
    }

    if !debit_wallet_if_sufficient(&mut tx, customer.as_str(), quote.price_cents).await? {
        tx.rollback().await?;
        return Ok(SaleOutcome::Declined);
    }
    if !decrement_stock_if_available(&mut tx, good_name).await? {
        tx.rollback().await?;
        return Ok(SaleOutcome::Declined);
    }

    let sale_id = insert_sale(
        &mut tx,
        customer.as_str(),
        good_name,
        Utc::now(),
        quote.price_cents,
    )
    .await?;

    tx.commit().await?;
    tracing::info!(%sale_id, customer = %customer, good = good_name, "sale recorded");

    Ok(SaleOutcome::Success)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::sales::SaleRepository;
    use crate::db::test_pool;
    use rust_decimal::Decimal;

    async fn seed_customer(pool: &SqlitePool, username: &str, cents: i64) {
        sqlx::query("INSERT INTO customers (username, wallet_balance_cents) VALUES (?, ?)")
            .bind(username)
            .bind(cents)
            .execute(pool)
            .await
            .unwrap();
    }

    async fn seed_good(pool: &SqlitePool, name: &str, price_cents: i64, stock: i64) {
        sqlx::query("INSERT INTO goods (name, price_cents, stock_count) VALUES (?, ?, ?)")
            .bind(name)
            .bind(price_cents)
            .bind(stock)
            .execute(pool)
            .await
            .unwrap();
    }

    async fn wallet(pool: &SqlitePool, username: &str) -> i64 {
        sqlx::query_scalar("SELECT wallet_balance_cents FROM customers WHERE username = ?")
            .bind(username)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn stock(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query_scalar("SELECT stock_count FROM goods WHERE name = ?")
            .bind(name)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_successful_sale_moves_money_and_stock() {
        let pool = test_pool().await;
        seed_customer(&pool, "bob", 100_000).await;
        seed_good(&pool, "Widget", 10_000, 5).await;
        let bob = Username::parse("bob").unwrap();

        let outcome = execute_sale(&pool, &bob, "Widget").await.unwrap();
        assert_eq!(outcome, SaleOutcome::Success);

        assert_eq!(wallet(&pool, "bob").await, 90_000);
        assert_eq!(stock(&pool, "Widget").await, 4);

        let sales = SaleRepository::new(&pool)
            .list_by_customer("bob")
            .await
            .unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].sale_amount, Decimal::new(10_000, 2));
    }

    #[tokio::test]
    async fn test_insufficient_funds_declines_without_mutation() {
        let pool = test_pool().await;
        seed_customer(&pool, "alice", 10_000).await;
        seed_good(&pool, "Smartphone", 49_999, 3).await;
        let alice = Username::parse("alice").unwrap();

        let outcome = execute_sale(&pool, &alice, "Smartphone").await.unwrap();
        assert_eq!(outcome, SaleOutcome::Declined);

        assert_eq!(wallet(&pool, "alice").await, 10_000);
        assert_eq!(stock(&pool, "Smartphone").await, 3);
        assert!(
            SaleRepository::new(&pool)
                .list_by_customer("alice")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_out_of_stock_declines() {
        let pool = test_pool().await;
        seed_customer(&pool, "bob", 100_000).await;
        seed_good(&pool, "Widget", 10_000, 0).await;
        let bob = Username::parse("bob").unwrap();

        let outcome = execute_sale(&pool, &bob, "Widget").await.unwrap();
        assert_eq!(outcome, SaleOutcome::Declined);
        assert_eq!(wallet(&pool, "bob").await, 100_000);
    }

    #[tokio::test]
    async fn test_missing_customer_and_good() {
        let pool = test_pool().await;
        seed_customer(&pool, "bob", 100_000).await;
        seed_good(&pool, "Widget", 10_000, 5).await;
        let bob = Username::parse("bob").unwrap();
        let ghost = Username::parse("ghost").unwrap();

        assert_eq!(
            execute_sale(&pool, &ghost, "Widget").await.unwrap(),
            SaleOutcome::CustomerNotFound
        );
        assert_eq!(
            execute_sale(&pool, &bob, "Phantom").await.unwrap(),
            SaleOutcome::GoodNotFound
        );
    }

    #[tokio::test]
    async fn test_concurrent_sales_never_oversell() {
        let pool = test_pool().await;
        seed_good(&pool, "Widget", 10_000, 1).await;
        for i in 0..8 {
            seed_customer(&pool, &format!("buyer{i}"), 100_000).await;
        }

        let mut handles = Vec::new();
        for i in 0..8 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                let buyer = Username::parse(&format!("buyer{i}")).unwrap();
                execute_sale(&pool, &buyer, "Widget").await.unwrap()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() == SaleOutcome::Success {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(stock(&pool, "Widget").await, 0);
    }
}
