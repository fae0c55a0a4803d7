//! Route handlers for the sales service.

pub mod sales;

use axum::Router;

use crate::state::AppState;

/// Build the combined router for all sales routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(sales::router())
}
