//! Review repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use souk_core::{ModerationStatus, Rating, ReviewId, Username};

use super::RepositoryError;
use crate::models::Review;

/// Fields required to create a review row. New reviews start unflagged and
/// unmoderated.
#[derive(Debug)]
pub struct NewReviewRecord {
    pub product_name: String,
    pub customer_username: Username,
    pub rating: Rating,
    pub comment: String,
}

/// Whitelisted fields for a review edit. Editing never touches the flag or
/// the moderation verdict.
#[derive(Debug, Default)]
pub struct ReviewChanges {
    pub rating: Option<Rating>,
    pub comment: Option<String>,
}

/// Outcome of a moderation attempt.
#[derive(Debug)]
pub enum ModerationOutcome {
    /// Verdict recorded, flag cleared; carries the updated review.
    Moderated(Review),
    /// The review exists but is not flagged; nothing changed.
    NotFlagged,
    /// No review with that ID.
    NotFound,
}

/// Raw review row as stored in SQLite.
#[derive(sqlx::FromRow)]
struct ReviewRow {
    review_id: i64,
    product_name: String,
    customer_username: String,
    rating: i64,
    comment: String,
    flagged: bool,
    moderated: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let customer_username = Username::parse(&row.customer_username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let rating = Rating::parse(row.rating).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid rating in database: {e}"))
        })?;
        let moderated = row.moderated.parse::<ModerationStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid moderation state in database: {e}"))
        })?;

        Ok(Self {
            id: ReviewId::new(row.review_id),
            product_name: row.product_name,
            customer_username,
            rating,
            comment: row.comment,
            flagged: row.flagged,
            moderated,
            created_at: row.created_at,
        })
    }
}

const SELECT_REVIEW: &str = r"
    SELECT review_id, product_name, customer_username, rating, comment,
           flagged, moderated, created_at
    FROM reviews
";

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a review in the initial unflagged, unmoderated state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, record: &NewReviewRecord) -> Result<Review, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO reviews (product_name, customer_username, rating, comment, created_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.product_name)
        .bind(record.customer_username.as_str())
        .bind(record.rating.as_i64())
        .bind(&record.comment)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        self.get_by_id(ReviewId::new(result.last_insert_rowid()))
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption("inserted review row not found".to_owned())
            })
    }

    /// Get a review by its ID. Returns `None` for a missing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!("{SELECT_REVIEW} WHERE review_id = ?"))
            .bind(id.as_i64())
            .fetch_optional(self.pool)
            .await?;

        row.map(Review::try_from).transpose()
    }

    /// List all reviews for a product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_product(&self, product_name: &str) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "{SELECT_REVIEW} WHERE product_name = ? ORDER BY review_id"
        ))
        .bind(product_name)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    /// List all reviews written by a customer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_customer(
        &self,
        username: &Username,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "{SELECT_REVIEW} WHERE customer_username = ? ORDER BY review_id"
        ))
        .bind(username.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    /// Edit a review's rating and comment. Unset fields keep their current
    /// value; the flag and moderation state are untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ReviewId,
        changes: &ReviewChanges,
    ) -> Result<Review, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE reviews
            SET rating  = COALESCE(?, rating),
                comment = COALESCE(?, comment)
            WHERE review_id = ?
            ",
        )
        .bind(changes.rating.map(Rating::as_i64))
        .bind(changes.comment.as_deref())
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_id(id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption("updated review row not found".to_owned())
        })
    }

    /// Delete a review by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE review_id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Flag a review for moderation. Idempotent: flagging a flagged review is
    /// a no-op success.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn flag(&self, id: ReviewId) -> Result<Review, RepositoryError> {
        let result = sqlx::query("UPDATE reviews SET flagged = 1 WHERE review_id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_id(id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption("flagged review row not found".to_owned())
        })
    }

    /// Record a moderation verdict on a flagged review and clear the flag.
    ///
    /// The flag precondition and both writes are one statement; an unflagged
    /// review is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn moderate(
        &self,
        id: ReviewId,
        verdict: ModerationStatus,
    ) -> Result<ModerationOutcome, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE reviews
            SET moderated = ?, flagged = 0
            WHERE review_id = ? AND flagged = 1
            ",
        )
        .bind(verdict.as_str())
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Disambiguate: a matching row means it simply was not flagged.
            return match self.get_by_id(id).await? {
                Some(_) => Ok(ModerationOutcome::NotFlagged),
                None => Ok(ModerationOutcome::NotFound),
            };
        }

        let review = self.get_by_id(id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption("moderated review row not found".to_owned())
        })?;

        Ok(ModerationOutcome::Moderated(review))
    }
}
