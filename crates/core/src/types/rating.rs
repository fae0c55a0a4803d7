//! Review rating type.

use serde::{Deserialize, Serialize};

/// Error returned when a rating falls outside 1..=5.
#[derive(thiserror::Error, Debug, Clone, Copy)]
#[error("rating must be between 1 and 5, got {0}")]
pub struct RatingError(pub i64);

/// A review rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    /// Parse a rating, rejecting values outside 1..=5.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError`] when out of range.
    pub fn parse(value: i64) -> Result<Self, RatingError> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        match value {
            1..=5 => Ok(Self(value as u8)),
            other => Err(RatingError(other)),
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.as_i64()
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
