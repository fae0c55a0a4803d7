//! Customer repository for database operations.

use sqlx::SqlitePool;

use souk_core::{CustomerId, Username, cents_to_decimal};

use super::RepositoryError;
use crate::models::customer::Customer;

/// Fields required to create a customer row.
///
/// The password arrives here already hashed; the repository never sees
/// plaintext credentials.
#[derive(Debug)]
pub struct NewCustomerRecord {
    pub full_name: String,
    pub username: Username,
    pub password_hash: String,
    pub age: i64,
    pub address: String,
    pub gender: String,
    pub marital_status: String,
}

/// Whitelisted fields for a partial customer update.
///
/// Only these fields can be changed after registration; the wallet balance is
/// mutated exclusively through the ledger operations and the username is the
/// natural key other services reference.
#[derive(Debug, Default)]
pub struct CustomerChanges {
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
    pub age: Option<i64>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
}

/// Raw customer row as stored in SQLite.
#[derive(sqlx::FromRow)]
struct CustomerRow {
    customer_id: i64,
    full_name: String,
    username: String,
    age: i64,
    address: String,
    gender: String,
    marital_status: String,
    wallet_balance_cents: i64,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerId::new(row.customer_id),
            full_name: row.full_name,
            username,
            age: row.age,
            address: row.address,
            gender: row.gender,
            marital_status: row.marital_status,
            wallet_balance: cents_to_decimal(row.wallet_balance_cents),
        })
    }
}

const SELECT_CUSTOMER: &str = r"
    SELECT customer_id, full_name, username, age, address, gender,
           marital_status, wallet_balance_cents
    FROM customers
";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new customer. The wallet balance starts at zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, record: &NewCustomerRecord) -> Result<Customer, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO customers
                (full_name, username, password_hash, age, address, gender, marital_status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.full_name)
        .bind(record.username.as_str())
        .bind(&record.password_hash)
        .bind(record.age)
        .bind(&record.address)
        .bind(&record.gender)
        .bind(&record.marital_status)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        self.get_by_id(CustomerId::new(result.last_insert_rowid()))
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption("inserted customer row not found".to_owned())
            })
    }

    /// List all customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(SELECT_CUSTOMER)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    /// Get a customer by their ID. Returns `None` for a missing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row =
            sqlx::query_as::<_, CustomerRow>(&format!("{SELECT_CUSTOMER} WHERE customer_id = ?"))
                .bind(id.as_i64())
                .fetch_optional(self.pool)
                .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Get a customer by their unique username. Returns `None` for a missing
    /// row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!("{SELECT_CUSTOMER} WHERE username = ?"))
            .bind(username.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Apply a partial update to a customer, keyed by username.
    ///
    /// Unset fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        username: &Username,
        changes: &CustomerChanges,
    ) -> Result<Customer, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customers
            SET full_name      = COALESCE(?, full_name),
                password_hash  = COALESCE(?, password_hash),
                age            = COALESCE(?, age),
                address        = COALESCE(?, address),
                gender         = COALESCE(?, gender),
                marital_status = COALESCE(?, marital_status)
            WHERE username = ?
            ",
        )
        .bind(changes.full_name.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.age)
        .bind(changes.address.as_deref())
        .bind(changes.gender.as_deref())
        .bind(changes.marital_status.as_deref())
        .bind(username.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_username(username).await?.ok_or_else(|| {
            RepositoryError::DataCorruption("updated customer row not found".to_owned())
        })
    }

    /// Delete a customer by username.
    ///
    /// Deleting a customer does not cascade into the sales history; sale rows
    /// reference customers by denormalized username only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, username: &Username) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE username = ?")
            .bind(username.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Add cents to a customer's wallet. The caller validates amount > 0.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer is absent.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn credit_wallet(
        &self,
        username: &Username,
        cents: i64,
    ) -> Result<Customer, RepositoryError> {
        let result = sqlx::query(
            "UPDATE customers SET wallet_balance_cents = wallet_balance_cents + ? WHERE username = ?",
        )
        .bind(cents)
        .bind(username.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_username(username).await?.ok_or_else(|| {
            RepositoryError::DataCorruption("credited customer row not found".to_owned())
        })
    }

    /// Subtract cents from a customer's wallet. The caller validates
    /// amount > 0; this primitive deliberately does not enforce a
    /// non-negative balance - that precondition belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer is absent.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn debit_wallet(
        &self,
        username: &Username,
        cents: i64,
    ) -> Result<Customer, RepositoryError> {
        let result = sqlx::query(
            "UPDATE customers SET wallet_balance_cents = wallet_balance_cents - ? WHERE username = ?",
        )
        .bind(cents)
        .bind(username.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_username(username).await?.ok_or_else(|| {
            RepositoryError::DataCorruption("debited customer row not found".to_owned())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use rust_decimal::Decimal;

    fn john() -> NewCustomerRecord {
        NewCustomerRecord {
            full_name: "John Doe".to_owned(),
            username: Username::parse("john_doe").unwrap(),
            password_hash: "$argon2id$fake".to_owned(),
            age: 30,
            address: "1 Main St".to_owned(),
            gender: "male".to_owned(),
            marital_status: "single".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_then_read_roundtrip() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);

        let created = repo.create(&john()).await.unwrap();
        assert_eq!(created.full_name, "John Doe");
        assert_eq!(created.wallet_balance, Decimal::ZERO);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.username.as_str(), "john_doe");
        assert_eq!(fetched.age, 30);
        assert_eq!(fetched.wallet_balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);

        repo.create(&john()).await.unwrap();
        let err = repo.create(&john()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);

        assert!(
            repo.get_by_id(CustomerId::new(999))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_partial_update_keeps_unset_fields() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);
        let created = repo.create(&john()).await.unwrap();

        let changes = CustomerChanges {
            address: Some("2 Side St".to_owned()),
            ..CustomerChanges::default()
        };
        let updated = repo.update(&created.username, &changes).await.unwrap();

        assert_eq!(updated.address, "2 Side St");
        assert_eq!(updated.full_name, "John Doe");
        assert_eq!(updated.age, 30);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);

        let err = repo
            .update(
                &Username::parse("ghost").unwrap(),
                &CustomerChanges::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);

        let err = repo
            .delete(&Username::parse("ghost").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_credit_and_debit_wallet() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);
        let created = repo.create(&john()).await.unwrap();

        let credited = repo.credit_wallet(&created.username, 10_000).await.unwrap();
        assert_eq!(credited.wallet_balance, Decimal::new(10_000, 2));

        let debited = repo.debit_wallet(&created.username, 2_550).await.unwrap();
        assert_eq!(debited.wallet_balance, Decimal::new(7_450, 2));
    }

    #[tokio::test]
    async fn test_wallet_ops_on_missing_customer() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);
        let ghost = Username::parse("ghost").unwrap();

        assert!(matches!(
            repo.credit_wallet(&ghost, 100).await.unwrap_err(),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            repo.debit_wallet(&ghost, 100).await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }
}
