//! Review domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use souk_core::{ModerationStatus, Rating, ReviewId, Username};

/// A product review.
///
/// A review is always in one of six states: flagged or not, crossed with
/// unmoderated/approved/rejected. New reviews start unflagged and
/// unmoderated; moderation requires a flag and clears it.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    /// Database identifier.
    pub id: ReviewId,
    /// Product under review, denormalized by name.
    pub product_name: String,
    /// Author, denormalized by username.
    pub customer_username: Username,
    /// Star rating, 1..=5.
    pub rating: Rating,
    /// Free-form review text.
    pub comment: String,
    /// Whether the review is currently flagged for moderation.
    pub flagged: bool,
    /// Moderation verdict, if any.
    pub moderated: ModerationStatus,
    /// When the review was submitted.
    pub created_at: DateTime<Utc>,
}
