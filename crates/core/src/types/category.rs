//! Good category enum.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown category.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid category: {0} (expected food, clothes, accessories or electronics)")]
pub struct CategoryError(pub String);

/// Category of a good in the inventory.
///
/// The set is closed: a good is always exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Clothes,
    Accessories,
    Electronics,
}

impl Category {
    /// Returns the lowercase string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Clothes => "clothes",
            Self::Accessories => "accessories",
            Self::Electronics => "electronics",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(Self::Food),
            "clothes" => Ok(Self::Clothes),
            "accessories" => Ok(Self::Accessories),
            "electronics" => Ok(Self::Electronics),
            other => Err(CategoryError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_variants() {
        for category in [
            Category::Food,
            Category::Clothes,
            Category::Accessories,
            Category::Electronics,
        ] {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert!("furniture".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Category::Electronics).unwrap();
        assert_eq!(json, "\"electronics\"");
    }
}
