//! End-to-end tests against running Souk services.
//!
//! # Running Tests
//!
//! Start each service in its own terminal (or background them):
//!
//! ```bash
//! cargo run -p souk-customers
//! cargo run -p souk-inventory
//! cargo run -p souk-sales
//! SOUK_JWT_SECRET=0123456789abcdef0123456789abcdef cargo run -p souk-reviews
//! ```
//!
//! Then run the ignored tests:
//!
//! ```bash
//! cargo test -p souk-integration-tests -- --ignored
//! ```
//!
//! Base URLs are configurable via `SOUK_CUSTOMERS_URL`, `SOUK_INVENTORY_URL`,
//! `SOUK_SALES_URL` and `SOUK_REVIEWS_URL`.

/// Base URL for the customers service.
#[must_use]
pub fn customers_base_url() -> String {
    std::env::var("SOUK_CUSTOMERS_URL").unwrap_or_else(|_| "http://localhost:7001".to_string())
}

/// Base URL for the inventory service.
#[must_use]
pub fn inventory_base_url() -> String {
    std::env::var("SOUK_INVENTORY_URL").unwrap_or_else(|_| "http://localhost:7002".to_string())
}

/// Base URL for the sales service.
#[must_use]
pub fn sales_base_url() -> String {
    std::env::var("SOUK_SALES_URL").unwrap_or_else(|_| "http://localhost:7003".to_string())
}

/// Base URL for the reviews service.
#[must_use]
pub fn reviews_base_url() -> String {
    std::env::var("SOUK_REVIEWS_URL").unwrap_or_else(|_| "http://localhost:7004".to_string())
}
