//! Sale ledger repository.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use souk_core::{SaleId, cents_to_decimal};

use super::RepositoryError;
use crate::models::sale::{AvailableGood, LocalGood, Sale};

/// Raw sale row as stored in SQLite.
#[derive(sqlx::FromRow)]
struct SaleRow {
    sale_id: i64,
    customer_username: String,
    good_name: String,
    sale_date: DateTime<Utc>,
    sale_amount_cents: i64,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Self {
            id: SaleId::new(row.sale_id),
            customer_username: row.customer_username,
            good_name: row.good_name,
            sale_date: row.sale_date,
            sale_amount: cents_to_decimal(row.sale_amount_cents),
        }
    }
}

/// Append a sale row snapshotting the price paid.
///
/// Runs on a borrowed connection so it can participate in the sale
/// transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_sale(
    conn: &mut SqliteConnection,
    customer_username: &str,
    good_name: &str,
    sale_date: DateTime<Utc>,
    amount_cents: i64,
) -> Result<SaleId, RepositoryError> {
    let result = sqlx::query(
        r"
        INSERT INTO sales (customer_username, good_name, sale_date, sale_amount_cents)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(customer_username)
    .bind(good_name)
    .bind(sale_date)
    .bind(amount_cents)
    .execute(conn)
    .await?;

    Ok(SaleId::new(result.last_insert_rowid()))
}

/// Read-side repository for sale history and the local goods catalog.
pub struct SaleRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all sales recorded for a customer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_customer(&self, username: &str) -> Result<Vec<Sale>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r"
            SELECT sale_id, customer_username, good_name, sale_date, sale_amount_cents
            FROM sales
            WHERE customer_username = ?
            ORDER BY sale_id
            ",
        )
        .bind(username)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Sale::from).collect())
    }

    /// List goods currently in stock, name and price only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn available_goods(&self) -> Result<Vec<AvailableGood>, RepositoryError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT name, price_cents FROM goods WHERE stock_count > 0 ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, price_cents)| AvailableGood {
                name,
                price: cents_to_decimal(price_cents),
            })
            .collect())
    }

    /// Full details of one local good. Returns `None` for a missing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn good_details(&self, name: &str) -> Result<Option<LocalGood>, RepositoryError> {
        let row = sqlx::query_as::<_, (String, i64, i64)>(
            "SELECT name, price_cents, stock_count FROM goods WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(name, price_cents, stock_count)| LocalGood {
            name,
            price: cents_to_decimal(price_cents),
            stock_count,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_insert_and_list_by_customer() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let now = Utc::now();
        insert_sale(&mut conn, "bob", "Widget", now, 10_000)
            .await
            .unwrap();
        insert_sale(&mut conn, "bob", "Gadget", now, 2_500)
            .await
            .unwrap();
        insert_sale(&mut conn, "alice", "Widget", now, 10_000)
            .await
            .unwrap();
        drop(conn);

        let repo = SaleRepository::new(&pool);
        let sales = repo.list_by_customer("bob").await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].good_name, "Widget");
        assert_eq!(sales[0].sale_amount, Decimal::new(10_000, 2));
        assert_eq!(sales[1].good_name, "Gadget");
    }

    #[tokio::test]
    async fn test_available_goods_hides_out_of_stock() {
        let pool = test_pool().await;
        sqlx::query(
            r"
            INSERT INTO goods (name, price_cents, stock_count)
            VALUES ('Widget', 10000, 5), ('Gone', 500, 0)
            ",
        )
        .execute(&pool)
        .await
        .unwrap();

        let repo = SaleRepository::new(&pool);
        let goods = repo.available_goods().await.unwrap();
        assert_eq!(goods.len(), 1);
        assert_eq!(goods[0].name, "Widget");
        assert_eq!(goods[0].price, Decimal::new(10_000, 2));
    }

    #[tokio::test]
    async fn test_good_details() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO goods (name, price_cents, stock_count) VALUES ('Widget', 10000, 5)")
            .execute(&pool)
            .await
            .unwrap();

        let repo = SaleRepository::new(&pool);
        let good = repo.good_details("Widget").await.unwrap().unwrap();
        assert_eq!(good.stock_count, 5);
        assert!(repo.good_details("ghost").await.unwrap().is_none());
    }
}
