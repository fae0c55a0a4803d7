//! User registration and login API handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};

use souk_core::{Role, Username, hash_password, validate_password, verify_password};

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
}

/// Request body for registration. Role defaults to `user` and is immutable
/// after registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Response body for registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub username: String,
    pub role: Role,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for login: the bearer token for subsequent requests.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Register a new user account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let username = Username::parse(&body.username)?;
    validate_password(&body.password)?;
    let password_hash = hash_password(&body.password)?;

    UserRepository::new(state.pool())
        .create(&username, &password_hash, body.role)
        .await?;
    tracing::info!(%username, role = %body.role, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: username.into_inner(),
            role: body.role,
        }),
    ))
}

/// Verify credentials and issue an access token.
///
/// An unknown username and a wrong password answer identically.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let username = Username::parse(&body.username)?;

    let user = UserRepository::new(state.pool())
        .get_by_username(&username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    verify_password(&body.password, &user.password_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    let token = state.jwt().issue(&user.username, user.role)?;
    tracing::info!(%username, "user logged in");

    Ok(Json(LoginResponse { token }))
}
