//! Sale ledger domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use souk_core::SaleId;

/// One recorded sale.
///
/// `sale_amount` snapshots the price at the moment of sale; later price
/// changes do not rewrite history.
#[derive(Debug, Clone, Serialize)]
pub struct Sale {
    /// Database identifier.
    pub id: SaleId,
    /// Buyer, denormalized by username.
    pub customer_username: String,
    /// Good sold, denormalized by name.
    pub good_name: String,
    /// When the sale was committed.
    pub sale_date: DateTime<Utc>,
    /// Price paid, in whole currency units.
    pub sale_amount: Decimal,
}

/// Catalog listing entry: goods in stock, name and price only.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableGood {
    pub name: String,
    #[serde(rename = "price_per_item")]
    pub price: Decimal,
}

/// Full details of one local good.
#[derive(Debug, Clone, Serialize)]
pub struct LocalGood {
    pub name: String,
    #[serde(rename = "price_per_item")]
    pub price: Decimal,
    pub stock_count: i64,
}
