//! Unified error handling for the reviews service.
//!
//! Provides a unified `AppError` type mapped onto HTTP status codes. All route
//! handlers return `Result<T, AppError>`; the response body is a JSON object
//! with a single `error` field.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use souk_core::{PasswordError, RatingError, UsernameError};

use crate::auth::AuthError;
use crate::db::RepositoryError;

/// Application-level error type for the reviews service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid token.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Wrong username or password at login.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authenticated but not allowed to do this.
    #[error("Forbidden")]
    Forbidden,
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("review not found".to_owned()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken => Self::Unauthenticated,
            AuthError::TokenIssuance => {
                Self::Database(RepositoryError::DataCorruption(err.to_string()))
            }
        }
    }
}

impl From<UsernameError> for AppError {
    fn from(err: UsernameError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<RatingError> for AppError {
    fn from(err: RatingError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort => Self::BadRequest(err.to_string()),
            PasswordError::Mismatch => Self::InvalidCredentials,
            PasswordError::Hash => {
                Self::Database(RepositoryError::DataCorruption(err.to_string()))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::Unauthenticated),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::NotFound("test".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_owned())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_auth_errors_map_to_unauthenticated() {
        assert!(matches!(
            AppError::from(AuthError::MissingToken),
            AppError::Unauthenticated
        ));
        assert!(matches!(
            AppError::from(AuthError::InvalidToken),
            AppError::Unauthenticated
        ));
    }
}
