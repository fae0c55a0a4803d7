//! Customer domain model.

use rust_decimal::Decimal;
use serde::Serialize;

use souk_core::{CustomerId, Username};

/// A customer account with profile fields and a wallet.
///
/// The password hash stays in the database layer and is never serialized in
/// API responses.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    /// Database identifier.
    pub id: CustomerId,
    /// Display name.
    pub full_name: String,
    /// Unique handle; the key other services reference.
    pub username: Username,
    /// Age in years.
    pub age: i64,
    /// Free-form postal address.
    pub address: String,
    /// Free-form gender.
    pub gender: String,
    /// Free-form marital status.
    pub marital_status: String,
    /// Wallet balance in whole currency units (two decimal places).
    pub wallet_balance: Decimal,
}
