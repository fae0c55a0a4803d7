//! Token-based authentication.
//!
//! Login issues an HS256 JWT carrying the username and role; every protected
//! handler takes a [`CurrentUser`] extractor that validates the token from
//! the `Authorization: Bearer` header.

pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtService};

use thiserror::Error;

/// Errors from token issuance and validation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header on the request.
    #[error("missing bearer token")]
    MissingToken,

    /// The token is expired, malformed, or carries a bad signature.
    #[error("invalid token")]
    InvalidToken,

    /// Token issuance failed.
    #[error("failed to issue token")]
    TokenIssuance,
}
