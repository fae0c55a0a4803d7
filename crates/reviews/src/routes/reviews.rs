//! Review CRUD, flagging and moderation API handlers.
//!
//! Every mutating route requires a valid bearer token. Edits and deletes are
//! author-or-admin; moderation is admin-only and requires the review to be
//! flagged first.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;

use souk_core::{ModerationStatus, Rating, ReviewId, Username};

use crate::auth::CurrentUser;
use crate::db::reviews::{ModerationOutcome, NewReviewRecord, ReviewChanges, ReviewRepository};
use crate::error::{AppError, Result};
use crate::models::Review;
use crate::state::AppState;

/// Build the reviews router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reviews", post(submit_review))
        .route("/api/reviews/product/{name}", get(list_product_reviews))
        .route(
            "/api/reviews/customer/{username}",
            get(list_customer_reviews),
        )
        .route("/api/reviews/{id}", get(get_review))
        .route("/api/reviews/{id}", put(update_review))
        .route("/api/reviews/{id}", delete(delete_review))
        .route("/api/reviews/{id}/flag", post(flag_review))
        .route("/api/reviews/{id}/moderate", post(moderate_review))
}

/// Request body for submitting a review. The author is the token subject; an
/// absent comment is stored as empty text.
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub product_name: String,
    pub rating: Rating,
    pub comment: Option<String>,
}

/// Request body for editing a review. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<Rating>,
    pub comment: Option<String>,
}

/// Moderation action.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl ModerationAction {
    const fn verdict(self) -> ModerationStatus {
        match self {
            Self::Approve => ModerationStatus::Approved,
            Self::Reject => ModerationStatus::Rejected,
        }
    }
}

/// Request body for moderating a flagged review.
#[derive(Debug, Deserialize)]
pub struct ModerateReviewRequest {
    pub action: ModerationAction,
}

/// Submit a review. Starts unflagged and unmoderated.
pub async fn submit_review(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<Review>)> {
    if body.product_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "product_name must not be empty".to_owned(),
        ));
    }

    let record = NewReviewRecord {
        product_name: body.product_name,
        customer_username: user.username,
        rating: body.rating,
        comment: body.comment.unwrap_or_default(),
    };

    let review = ReviewRepository::new(state.pool()).create(&record).await?;
    tracing::info!(review_id = %review.id, product = %review.product_name, "review submitted");

    Ok((StatusCode::CREATED, Json(review)))
}

/// List all reviews for a product.
pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Review>>> {
    let reviews = ReviewRepository::new(state.pool())
        .list_by_product(&name)
        .await?;

    Ok(Json(reviews))
}

/// List all reviews written by a customer.
pub async fn list_customer_reviews(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Review>>> {
    let username = Username::parse(&username)?;
    let reviews = ReviewRepository::new(state.pool())
        .list_by_customer(&username)
        .await?;

    Ok(Json(reviews))
}

/// Get one review by ID.
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Review>> {
    let review = ReviewRepository::new(state.pool())
        .get_by_id(ReviewId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("review {id} not found")))?;

    Ok(Json(review))
}

/// Edit a review's rating and comment. Author or admin only; the moderation
/// state is untouched.
pub async fn update_review(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<Review>> {
    let repo = ReviewRepository::new(state.pool());
    let review = repo
        .get_by_id(ReviewId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("review {id} not found")))?;

    if !user.can_act_for(&review.customer_username) {
        return Err(AppError::Forbidden);
    }

    let changes = ReviewChanges {
        rating: body.rating,
        comment: body.comment,
    };
    let updated = repo.update(review.id, &changes).await?;

    Ok(Json(updated))
}

/// Delete a review. Author or admin only.
pub async fn delete_review(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let repo = ReviewRepository::new(state.pool());
    let review = repo
        .get_by_id(ReviewId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("review {id} not found")))?;

    if !user.can_act_for(&review.customer_username) {
        return Err(AppError::Forbidden);
    }

    repo.delete(review.id).await?;
    tracing::info!(review_id = id, "review deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Flag a review for moderation. Any authenticated user; idempotent.
pub async fn flag_review(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Review>> {
    let review = ReviewRepository::new(state.pool())
        .flag(ReviewId::new(id))
        .await?;
    tracing::info!(review_id = id, flagged_by = %user.username, "review flagged");

    Ok(Json(review))
}

/// Approve or reject a flagged review. Admin only; moderating an unflagged
/// review is a 400 and changes nothing.
pub async fn moderate_review(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ModerateReviewRequest>,
) -> Result<Json<Review>> {
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }

    let outcome = ReviewRepository::new(state.pool())
        .moderate(ReviewId::new(id), body.action.verdict())
        .await?;

    match outcome {
        ModerationOutcome::Moderated(review) => {
            tracing::info!(review_id = id, verdict = %review.moderated, "review moderated");
            Ok(Json(review))
        }
        ModerationOutcome::NotFlagged => {
            Err(AppError::BadRequest("review is not flagged".to_owned()))
        }
        ModerationOutcome::NotFound => Err(AppError::NotFound(format!("review {id} not found"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_body_comment_is_optional() {
        let body: SubmitReviewRequest =
            serde_json::from_str(r#"{"product_name":"Widget","rating":5}"#).unwrap();
        assert_eq!(body.product_name, "Widget");
        assert!(body.comment.is_none());
    }

    #[test]
    fn test_moderation_action_parses_snake_case() {
        let approve: ModerationAction = serde_json::from_str("\"approve\"").unwrap();
        assert!(matches!(approve.verdict(), ModerationStatus::Approved));

        let reject: ModerationAction = serde_json::from_str("\"reject\"").unwrap();
        assert!(matches!(reject.verdict(), ModerationStatus::Rejected));

        assert!(serde_json::from_str::<ModerationAction>("\"ban\"").is_err());
    }
}
