//! Sale transaction and sale history API handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use souk_core::Username;

use crate::db::sales::SaleRepository;
use crate::error::{AppError, Result};
use crate::models::Sale;
use crate::models::sale::{AvailableGood, LocalGood};
use crate::services::sale::{SaleOutcome, execute_sale};
use crate::state::AppState;

/// Build the sales router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sales", post(make_sale))
        .route("/api/sales/goods", get(list_available_goods))
        .route("/api/sales/goods/{name}", get(get_good_details))
        .route("/api/sales/customer/{username}", get(list_customer_sales))
}

/// Request body for a sale.
#[derive(Debug, Deserialize)]
pub struct MakeSaleRequest {
    pub customer_username: String,
    pub good_name: String,
}

/// Status reported to the caller after a sale attempt.
///
/// The string values are a wire contract; clients match on them.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum SaleStatus {
    Success,
    Declined,
    CustomerNotFound,
    GoodNotFound,
    TransactionFailed,
}

/// Response body for a sale attempt.
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub status: SaleStatus,
}

/// Attempt to sell one unit of a good to a customer.
///
/// Always answers with a `{"status": ...}` body; the HTTP status mirrors the
/// outcome (200 success, 400 declined, 404 missing party, 500 storage fault).
pub async fn make_sale(
    State(state): State<AppState>,
    Json(body): Json<MakeSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>)> {
    let customer = Username::parse(&body.customer_username)?;

    let (code, status) = match execute_sale(state.pool(), &customer, &body.good_name).await {
        Ok(SaleOutcome::Success) => (StatusCode::OK, SaleStatus::Success),
        Ok(SaleOutcome::Declined) => (StatusCode::BAD_REQUEST, SaleStatus::Declined),
        Ok(SaleOutcome::CustomerNotFound) => (StatusCode::NOT_FOUND, SaleStatus::CustomerNotFound),
        Ok(SaleOutcome::GoodNotFound) => (StatusCode::NOT_FOUND, SaleStatus::GoodNotFound),
        Err(err) => {
            // The transaction rolled back; the attempt is retryable.
            tracing::error!(error = %err, "sale transaction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                SaleStatus::TransactionFailed,
            )
        }
    };

    Ok((code, Json(SaleResponse { status })))
}

/// List goods currently available for sale.
pub async fn list_available_goods(
    State(state): State<AppState>,
) -> Result<Json<Vec<AvailableGood>>> {
    let goods = SaleRepository::new(state.pool()).available_goods().await?;
    Ok(Json(goods))
}

/// Get the local details of one good.
pub async fn get_good_details(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<LocalGood>> {
    let good = SaleRepository::new(state.pool())
        .good_details(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("good {name} not found")))?;

    Ok(Json(good))
}

/// List a customer's sale history.
pub async fn list_customer_sales(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Sale>>> {
    let username = Username::parse(&username)?;
    let sales = SaleRepository::new(state.pool())
        .list_by_customer(username.as_str())
        .await?;

    Ok(Json(sales))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_available_good_wire_field_is_price_per_item() {
        let json = serde_json::to_value(AvailableGood {
            name: "Widget".to_owned(),
            price: Decimal::new(10_000, 2),
        })
        .unwrap_or_default();
        assert_eq!(json["price_per_item"], "100.00");
        assert!(json.get("price").is_none());
    }

    #[test]
    fn test_sale_status_wire_names() {
        let json = serde_json::to_string(&SaleResponse {
            status: SaleStatus::CustomerNotFound,
        })
        .unwrap_or_default();
        assert_eq!(json, r#"{"status":"CustomerNotFound"}"#);
    }
}
