//! User account repository for the reviews service.

use sqlx::SqlitePool;

use souk_core::{Role, Username};

use super::RepositoryError;

/// A stored user account. Stays inside the service; the password hash never
/// leaves the database layer except for verification.
#[derive(Debug)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: Username,
    pub password_hash: String,
    pub role: Role,
}

/// Raw user row as stored in SQLite.
#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    username: String,
    password_hash: String,
    role: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid role in database: {e}")))?;

        Ok(Self {
            user_id: row.user_id,
            username,
            password_hash: row.password_hash,
            role,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
        role: Role,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO users (username, password_hash, role) VALUES (?, ?, ?)")
            .bind(username.as_str())
            .bind(password_hash)
            .bind(role.as_str())
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

        Ok(())
    }

    /// Get a user by username. Returns `None` for a missing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, username, password_hash, role FROM users WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);
        let alice = Username::parse("alice").unwrap();

        repo.create(&alice, "$argon2id$fake", Role::Admin)
            .await
            .unwrap();

        let user = repo.get_by_username(&alice).await.unwrap().unwrap();
        assert_eq!(user.username, alice);
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.password_hash, "$argon2id$fake");
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);
        let bob = Username::parse("bob").unwrap();

        repo.create(&bob, "hash", Role::User).await.unwrap();
        let err = repo.create(&bob, "hash2", Role::User).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);
        let ghost = Username::parse("ghost").unwrap();

        assert!(repo.get_by_username(&ghost).await.unwrap().is_none());
    }
}
