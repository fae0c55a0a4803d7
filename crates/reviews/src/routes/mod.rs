//! Route handlers for the reviews service.

pub mod reviews;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the combined router for all review routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(users::router()).merge(reviews::router())
}
