//! Good domain model.

use rust_decimal::Decimal;
use serde::Serialize;

use souk_core::{Category, GoodId};

/// A good in the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Good {
    /// Database identifier.
    pub id: GoodId,
    /// Unique name; the key other services reference.
    pub name: String,
    /// Category from the closed set.
    pub category: Category,
    /// Price in whole currency units (two decimal places).
    #[serde(rename = "price_per_item")]
    pub price: Decimal,
    /// Free-form description.
    pub description: String,
    /// Units on hand; never negative.
    pub stock_count: i64,
}
