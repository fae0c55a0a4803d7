//! Route handlers for the inventory service.

pub mod goods;

use axum::Router;

use crate::state::AppState;

/// Build the combined router for all inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(goods::router())
}
