//! Review moderation status.

use serde::{Deserialize, Serialize};

/// Moderation verdict on a review.
///
/// Orthogonal to the `flagged` bit: a review can be flagged regardless of any
/// previous verdict, and moderating a flagged review records the verdict and
/// clears the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    /// No verdict recorded yet.
    #[default]
    Unmoderated,
    /// An admin approved the review.
    Approved,
    /// An admin rejected the review.
    Rejected,
}

impl ModerationStatus {
    /// Returns the lowercase string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unmoderated => "unmoderated",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unmoderated" => Ok(Self::Unmoderated),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid moderation status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_variants() {
        for status in [
            ModerationStatus::Unmoderated,
            ModerationStatus::Approved,
            ModerationStatus::Rejected,
        ] {
            let parsed: ModerationStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_default_is_unmoderated() {
        assert_eq!(ModerationStatus::default(), ModerationStatus::Unmoderated);
    }
}
