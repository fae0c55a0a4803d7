//! Goods CRUD and stock API handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use souk_core::{Category, GoodId, decimal_to_cents};

use crate::db::goods::{GoodChanges, GoodRepository, NewGoodRecord, StockDeduction};
use crate::error::{AppError, Result};
use crate::models::Good;
use crate::state::AppState;

/// Build the goods router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/goods", get(list_goods))
        .route("/api/goods", post(create_good))
        .route("/api/goods/{id}", get(get_good))
        .route("/api/goods/{id}", put(update_good))
        .route("/api/goods/{id}", delete(delete_good))
        .route("/api/goods/{id}/deduct", put(deduct_stock))
}

/// Request body for creating a good. An absent description is stored as
/// empty text.
#[derive(Debug, Deserialize)]
pub struct CreateGoodRequest {
    pub name: String,
    pub category: Category,
    pub price_per_item: Decimal,
    pub description: Option<String>,
    pub stock_count: i64,
}

/// Request body for a partial good update. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateGoodRequest {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub price_per_item: Option<Decimal>,
    pub description: Option<String>,
    pub stock_count: Option<i64>,
}

/// Request body for a stock deduction.
#[derive(Debug, Deserialize)]
pub struct DeductStockRequest {
    pub quantity: i64,
}

/// List all goods.
pub async fn list_goods(State(state): State<AppState>) -> Result<Json<Vec<Good>>> {
    let goods = GoodRepository::new(state.pool()).list().await?;
    Ok(Json(goods))
}

/// Get a good by ID.
pub async fn get_good(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Good>> {
    let good = GoodRepository::new(state.pool())
        .get_by_id(GoodId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("good {id} not found")))?;

    Ok(Json(good))
}

/// Add a good to the catalog.
pub async fn create_good(
    State(state): State<AppState>,
    Json(body): Json<CreateGoodRequest>,
) -> Result<(StatusCode, Json<Good>)> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_owned()));
    }
    if body.stock_count < 0 {
        return Err(AppError::BadRequest(
            "stock_count must not be negative".to_owned(),
        ));
    }

    let record = NewGoodRecord {
        name: body.name,
        category: body.category,
        price_cents: non_negative_cents(body.price_per_item)?,
        description: body.description.unwrap_or_default(),
        stock_count: body.stock_count,
    };

    let good = GoodRepository::new(state.pool()).create(&record).await?;
    tracing::info!(name = %good.name, "good created");

    Ok((StatusCode::CREATED, Json(good)))
}

/// Apply a partial update to a good.
pub async fn update_good(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateGoodRequest>,
) -> Result<Json<Good>> {
    if let Some(name) = body.name.as_deref()
        && name.trim().is_empty()
    {
        return Err(AppError::BadRequest("name must not be empty".to_owned()));
    }
    if let Some(count) = body.stock_count
        && count < 0
    {
        return Err(AppError::BadRequest(
            "stock_count must not be negative".to_owned(),
        ));
    }

    let changes = GoodChanges {
        name: body.name,
        category: body.category,
        price_cents: body.price_per_item.map(non_negative_cents).transpose()?,
        description: body.description,
        stock_count: body.stock_count,
    };

    let good = GoodRepository::new(state.pool())
        .update(GoodId::new(id), &changes)
        .await?;

    Ok(Json(good))
}

/// Remove a good from the catalog.
pub async fn delete_good(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    GoodRepository::new(state.pool())
        .delete(GoodId::new(id))
        .await?;
    tracing::info!(good_id = id, "good deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Deduct stock from a good.
///
/// Insufficient stock is a 400, a missing good a 404; the deduction and its
/// precondition are one atomic statement.
pub async fn deduct_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<DeductStockRequest>,
) -> Result<Json<Good>> {
    if body.quantity <= 0 {
        return Err(AppError::BadRequest("quantity must be positive".to_owned()));
    }

    let outcome = GoodRepository::new(state.pool())
        .deduct_stock(GoodId::new(id), body.quantity)
        .await?;

    match outcome {
        StockDeduction::Deducted(good) => Ok(Json(good)),
        StockDeduction::Insufficient => {
            Err(AppError::BadRequest("insufficient stock".to_owned()))
        }
        StockDeduction::NotFound => Err(AppError::NotFound(format!("good {id} not found"))),
    }
}

/// Convert a decimal price to cents, rejecting negative values.
fn non_negative_cents(price: Decimal) -> Result<i64> {
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "price must not be negative".to_owned(),
        ));
    }
    Ok(decimal_to_cents(price)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_cents() {
        assert_eq!(non_negative_cents(Decimal::new(49_999, 2)).unwrap(), 49_999);
        assert_eq!(non_negative_cents(Decimal::ZERO).unwrap(), 0);
        assert!(non_negative_cents(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_create_body_description_is_optional() {
        let body: CreateGoodRequest = serde_json::from_str(
            r#"{"name":"Widget","category":"accessories","price_per_item":"100.00","stock_count":5}"#,
        )
        .unwrap();
        assert!(body.description.is_none());
        assert_eq!(body.price_per_item, Decimal::new(10_000, 2));
    }

    #[test]
    fn test_good_wire_field_is_price_per_item() {
        let good = Good {
            id: GoodId::new(1),
            name: "Widget".to_owned(),
            category: Category::Accessories,
            price: Decimal::new(10_000, 2),
            description: String::new(),
            stock_count: 5,
        };

        let json = serde_json::to_value(&good).unwrap();
        assert_eq!(json["price_per_item"], "100.00");
        assert!(json.get("price").is_none());
    }
}
