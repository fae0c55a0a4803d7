//! HS256 JWT issuance and validation, plus the `CurrentUser` extractor.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use souk_core::{Role, Username};

use super::AuthError;
use crate::config::ReviewsConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Claims carried in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder.
    pub sub: String,
    /// Role name (`user` or `admin`).
    pub role: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Signs and validates access tokens.
///
/// The keys are derived once from the configured secret; cloning the service
/// is cheap enough to keep it in `AppState`.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    /// Build the service from the loaded configuration.
    #[must_use]
    pub fn new(config: &ReviewsConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::minutes(config.jwt_ttl_minutes),
        }
    }

    /// Issue a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenIssuance` if signing fails.
    pub fn issue(&self, username: &Username, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.as_str().to_owned(),
            role: role.as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenIssuance)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for expired, malformed or forged
    /// tokens.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// The authenticated caller, parsed from the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Username from the token subject.
    pub username: Username,
    /// Role from the token.
    pub role: Role,
}

impl CurrentUser {
    /// Whether the caller holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether the caller may mutate a review owned by `author`.
    #[must_use]
    pub fn can_act_for(&self, author: &Username) -> bool {
        self.is_admin() || self.username == *author
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let username = Username::parse(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let role = claims.role.parse().map_err(|_| AuthError::InvalidToken)?;

        Ok(Self { username, role })
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingToken)?;

        let claims = state.jwt().validate(token)?;
        Ok(Self::try_from(claims)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_config() -> ReviewsConfig {
        ReviewsConfig {
            database_url: "sqlite::memory:".to_string(),
            host: "127.0.0.1".parse().unwrap(),
            port: 7004,
            jwt_secret: SecretString::from("0123456789abcdef0123456789abcdef"),
            jwt_ttl_minutes: 60,
        }
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let service = JwtService::new(&test_config());
        let alice = Username::parse("alice").unwrap();

        let token = service.issue(&alice, Role::Admin).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);

        let user = CurrentUser::try_from(claims).unwrap();
        assert!(user.is_admin());
        assert_eq!(user.username, alice);
    }

    #[test]
    fn test_forged_token_is_rejected() {
        let service = JwtService::new(&test_config());
        let other = JwtService::new(&ReviewsConfig {
            jwt_secret: SecretString::from("ffffffffffffffffffffffffffffffff"),
            ..test_config()
        });
        let bob = Username::parse("bob").unwrap();

        let token = other.issue(&bob, Role::User).unwrap();
        assert!(service.validate(&token).is_err());
        assert!(service.validate("not-a-token").is_err());
    }

    #[test]
    fn test_author_or_admin() {
        let alice = Username::parse("alice").unwrap();
        let bob = Username::parse("bob").unwrap();

        let user = CurrentUser {
            username: alice.clone(),
            role: Role::User,
        };
        assert!(user.can_act_for(&alice));
        assert!(!user.can_act_for(&bob));

        let admin = CurrentUser {
            username: bob,
            role: Role::Admin,
        };
        assert!(admin.can_act_for(&alice));
    }
}
