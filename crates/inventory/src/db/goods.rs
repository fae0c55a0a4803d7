//! Goods repository for database operations.

use sqlx::SqlitePool;

use souk_core::{Category, GoodId, cents_to_decimal};

use super::RepositoryError;
use crate::models::good::Good;

/// Fields required to create a good row. Prices arrive here already converted
/// to cents.
#[derive(Debug)]
pub struct NewGoodRecord {
    pub name: String,
    pub category: Category,
    pub price_cents: i64,
    pub description: String,
    pub stock_count: i64,
}

/// Whitelisted fields for a partial good update.
#[derive(Debug, Default)]
pub struct GoodChanges {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub price_cents: Option<i64>,
    pub description: Option<String>,
    pub stock_count: Option<i64>,
}

/// Outcome of a conditional stock deduction.
#[derive(Debug)]
pub enum StockDeduction {
    /// Stock was deducted; carries the updated good.
    Deducted(Good),
    /// The good exists but has fewer units than requested.
    Insufficient,
    /// No good with that ID.
    NotFound,
}

/// Raw good row as stored in SQLite.
#[derive(sqlx::FromRow)]
struct GoodRow {
    good_id: i64,
    name: String,
    category: String,
    price_cents: i64,
    description: String,
    stock_count: i64,
}

impl TryFrom<GoodRow> for Good {
    type Error = RepositoryError;

    fn try_from(row: GoodRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<Category>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid category in database: {e}"))
        })?;

        Ok(Self {
            id: GoodId::new(row.good_id),
            name: row.name,
            category,
            price: cents_to_decimal(row.price_cents),
            description: row.description,
            stock_count: row.stock_count,
        })
    }
}

const SELECT_GOOD: &str = r"
    SELECT good_id, name, category, price_cents, description, stock_count
    FROM goods
";

/// Repository for goods database operations.
pub struct GoodRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GoodRepository<'a> {
    /// Create a new goods repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new good.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, record: &NewGoodRecord) -> Result<Good, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO goods (name, category, price_cents, description, stock_count)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.name)
        .bind(record.category.as_str())
        .bind(record.price_cents)
        .bind(&record.description)
        .bind(record.stock_count)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("good name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        self.get_by_id(GoodId::new(result.last_insert_rowid()))
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption("inserted good row not found".to_owned())
            })
    }

    /// List all goods.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Good>, RepositoryError> {
        let rows = sqlx::query_as::<_, GoodRow>(SELECT_GOOD)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Good::try_from).collect()
    }

    /// Get a good by its ID. Returns `None` for a missing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: GoodId) -> Result<Option<Good>, RepositoryError> {
        let row = sqlx::query_as::<_, GoodRow>(&format!("{SELECT_GOOD} WHERE good_id = ?"))
            .bind(id.as_i64())
            .fetch_optional(self.pool)
            .await?;

        row.map(Good::try_from).transpose()
    }

    /// Get a good by its unique name. Returns `None` for a missing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Good>, RepositoryError> {
        let row = sqlx::query_as::<_, GoodRow>(&format!("{SELECT_GOOD} WHERE name = ?"))
            .bind(name)
            .fetch_optional(self.pool)
            .await?;

        row.map(Good::try_from).transpose()
    }

    /// Apply a partial update to a good, keyed by ID.
    ///
    /// Unset fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched.
    /// Returns `RepositoryError::Conflict` if a renamed good collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: GoodId, changes: &GoodChanges) -> Result<Good, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE goods
            SET name        = COALESCE(?, name),
                category    = COALESCE(?, category),
                price_cents = COALESCE(?, price_cents),
                description = COALESCE(?, description),
                stock_count = COALESCE(?, stock_count)
            WHERE good_id = ?
            ",
        )
        .bind(changes.name.as_deref())
        .bind(changes.category.map(|c| c.as_str()))
        .bind(changes.price_cents)
        .bind(changes.description.as_deref())
        .bind(changes.stock_count)
        .bind(id.as_i64())
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("good name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_id(id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption("updated good row not found".to_owned())
        })
    }

    /// Delete a good by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: GoodId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM goods WHERE good_id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Deduct `quantity` units of stock if at least that many are available.
    ///
    /// The precondition and the write are a single statement, so stock can
    /// never go negative under concurrent deductions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn deduct_stock(
        &self,
        id: GoodId,
        quantity: i64,
    ) -> Result<StockDeduction, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE goods
            SET stock_count = stock_count - ?
            WHERE good_id = ? AND stock_count >= ?
            ",
        )
        .bind(quantity)
        .bind(id.as_i64())
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Disambiguate: a matching row means there was not enough stock.
            return match self.get_by_id(id).await? {
                Some(_) => Ok(StockDeduction::Insufficient),
                None => Ok(StockDeduction::NotFound),
            };
        }

        let good = self.get_by_id(id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption("deducted good row not found".to_owned())
        })?;

        Ok(StockDeduction::Deducted(good))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use rust_decimal::Decimal;

    fn widget() -> NewGoodRecord {
        NewGoodRecord {
            name: "Widget".to_owned(),
            category: Category::Accessories,
            price_cents: 10_000,
            description: "A useful widget".to_owned(),
            stock_count: 5,
        }
    }

    #[tokio::test]
    async fn test_create_then_read_roundtrip() {
        let pool = test_pool().await;
        let repo = GoodRepository::new(&pool);

        let created = repo.create(&widget()).await.unwrap();
        assert_eq!(created.name, "Widget");
        assert_eq!(created.category, Category::Accessories);
        assert_eq!(created.price, Decimal::new(10_000, 2));
        assert_eq!(created.stock_count, 5);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Widget");

        let by_name = repo.get_by_name("Widget").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let pool = test_pool().await;
        let repo = GoodRepository::new(&pool);

        repo.create(&widget()).await.unwrap();
        let err = repo.create(&widget()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_unset_fields() {
        let pool = test_pool().await;
        let repo = GoodRepository::new(&pool);
        let created = repo.create(&widget()).await.unwrap();

        let changes = GoodChanges {
            price_cents: Some(12_500),
            ..GoodChanges::default()
        };
        let updated = repo.update(created.id, &changes).await.unwrap();

        assert_eq!(updated.price, Decimal::new(12_500, 2));
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.stock_count, 5);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let pool = test_pool().await;
        let repo = GoodRepository::new(&pool);

        let err = repo
            .update(GoodId::new(999), &GoodChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let pool = test_pool().await;
        let repo = GoodRepository::new(&pool);

        let err = repo.delete(GoodId::new(999)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_deduct_stock_success() {
        let pool = test_pool().await;
        let repo = GoodRepository::new(&pool);
        let created = repo.create(&widget()).await.unwrap();

        let outcome = repo.deduct_stock(created.id, 3).await.unwrap();
        match outcome {
            StockDeduction::Deducted(good) => assert_eq!(good.stock_count, 2),
            other => panic!("expected Deducted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deduct_stock_insufficient_leaves_count() {
        let pool = test_pool().await;
        let repo = GoodRepository::new(&pool);
        let created = repo.create(&widget()).await.unwrap();

        let outcome = repo.deduct_stock(created.id, 6).await.unwrap();
        assert!(matches!(outcome, StockDeduction::Insufficient));

        let good = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(good.stock_count, 5);
    }

    #[tokio::test]
    async fn test_deduct_stock_missing_good() {
        let pool = test_pool().await;
        let repo = GoodRepository::new(&pool);

        let outcome = repo.deduct_stock(GoodId::new(999), 1).await.unwrap();
        assert!(matches!(outcome, StockDeduction::NotFound));
    }
}
