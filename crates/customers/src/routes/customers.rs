//! Customer CRUD and wallet API handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use souk_core::{CustomerId, Username, decimal_to_cents, hash_password, validate_password};

use crate::db::customers::{CustomerChanges, CustomerRepository, NewCustomerRecord};
use crate::error::{AppError, Result};
use crate::models::Customer;
use crate::state::AppState;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(list_customers))
        .route("/api/customers", post(register_customer))
        .route("/api/customers/by-id/{id}", get(get_customer))
        .route("/api/customers/{username}", get(get_customer_by_username))
        .route("/api/customers/{username}", put(update_customer))
        .route("/api/customers/{username}", delete(delete_customer))
        .route(
            "/api/customers/{username}/wallet/charge",
            post(charge_wallet),
        )
        .route(
            "/api/customers/{username}/wallet/deduct",
            post(deduct_wallet),
        )
}

/// Request body for customer registration.
#[derive(Debug, Deserialize)]
pub struct RegisterCustomerRequest {
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub age: i64,
    pub address: String,
    pub gender: String,
    pub marital_status: String,
}

/// Request body for a partial customer update. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub age: Option<i64>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
}

/// Request body for wallet charge and deduct.
#[derive(Debug, Deserialize)]
pub struct WalletAmountRequest {
    pub amount: Decimal,
}

/// List all customers.
pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>> {
    let customers = CustomerRepository::new(state.pool()).list().await?;
    Ok(Json(customers))
}

/// Get a customer by numeric ID.
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>> {
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(CustomerId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id} not found")))?;

    Ok(Json(customer))
}

/// Get a customer by username.
pub async fn get_customer_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Customer>> {
    let username = Username::parse(&username)?;
    let customer = CustomerRepository::new(state.pool())
        .get_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {username} not found")))?;

    Ok(Json(customer))
}

/// Register a new customer. The wallet starts at zero.
pub async fn register_customer(
    State(state): State<AppState>,
    Json(body): Json<RegisterCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>)> {
    let username = Username::parse(&body.username)?;
    validate_password(&body.password)?;
    if body.age < 0 {
        return Err(AppError::BadRequest("age must not be negative".to_owned()));
    }

    let record = NewCustomerRecord {
        full_name: body.full_name,
        username,
        password_hash: hash_password(&body.password)?,
        age: body.age,
        address: body.address,
        gender: body.gender,
        marital_status: body.marital_status,
    };

    let customer = CustomerRepository::new(state.pool()).create(&record).await?;
    tracing::info!(username = %customer.username, "customer registered");

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Apply a partial update to a customer's profile.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<UpdateCustomerRequest>,
) -> Result<Json<Customer>> {
    let username = Username::parse(&username)?;
    if let Some(age) = body.age
        && age < 0
    {
        return Err(AppError::BadRequest("age must not be negative".to_owned()));
    }

    let password_hash = match body.password.as_deref() {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let changes = CustomerChanges {
        full_name: body.full_name,
        password_hash,
        age: body.age,
        address: body.address,
        gender: body.gender,
        marital_status: body.marital_status,
    };

    let customer = CustomerRepository::new(state.pool())
        .update(&username, &changes)
        .await?;

    Ok(Json(customer))
}

/// Delete a customer by username.
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode> {
    let username = Username::parse(&username)?;
    CustomerRepository::new(state.pool())
        .delete(&username)
        .await?;
    tracing::info!(%username, "customer deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Add funds to a customer's wallet.
pub async fn charge_wallet(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<WalletAmountRequest>,
) -> Result<Json<Customer>> {
    let username = Username::parse(&username)?;
    let cents = positive_cents(body.amount)?;

    let customer = CustomerRepository::new(state.pool())
        .credit_wallet(&username, cents)
        .await?;

    Ok(Json(customer))
}

/// Remove funds from a customer's wallet.
///
/// The balance is allowed to go negative; callers that need a floor check it
/// before deducting.
pub async fn deduct_wallet(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<WalletAmountRequest>,
) -> Result<Json<Customer>> {
    let username = Username::parse(&username)?;
    let cents = positive_cents(body.amount)?;

    let customer = CustomerRepository::new(state.pool())
        .debit_wallet(&username, cents)
        .await?;

    Ok(Json(customer))
}

/// Convert a decimal amount to cents, rejecting zero and negative values.
fn positive_cents(amount: Decimal) -> Result<i64> {
    if amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("amount must be positive".to_owned()));
    }
    Ok(decimal_to_cents(amount)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_cents_rejects_non_positive() {
        assert!(positive_cents(Decimal::ZERO).is_err());
        assert!(positive_cents(Decimal::new(-100, 2)).is_err());
    }

    #[test]
    fn test_positive_cents_converts() {
        assert_eq!(positive_cents(Decimal::new(1_050, 2)).unwrap(), 1_050);
    }

    #[test]
    fn test_positive_cents_rejects_sub_cent_precision() {
        assert!(positive_cents(Decimal::new(10_001, 4)).is_err());
    }
}
