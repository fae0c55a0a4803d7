//! Route handlers for the customers service.

pub mod customers;

use axum::Router;

use crate::state::AppState;

/// Build the combined router for all customer routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(customers::router())
}
