//! Reviews service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SOUK_JWT_SECRET` - HMAC secret for signing tokens (min 32 characters)
//!
//! ## Optional
//! - `SOUK_REVIEWS_DATABASE_URL` - SQLite database URL
//!   (default: `sqlite://reviews.db`)
//! - `SOUK_REVIEWS_HOST` - Bind address (default: 127.0.0.1)
//! - `SOUK_REVIEWS_PORT` - Listen port (default: 7004)
//! - `SOUK_JWT_TTL_MINUTES` - Token lifetime in minutes (default: 1440)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Minimum length for the JWT signing secret.
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Reviews service configuration.
#[derive(Debug, Clone)]
pub struct ReviewsConfig {
    /// SQLite database URL.
    pub database_url: String,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// HMAC secret for signing JWTs.
    pub jwt_secret: SecretString,
    /// Token lifetime in minutes.
    pub jwt_ttl_minutes: i64,
}

impl ReviewsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, the JWT
    /// secret is too short, or a variable is unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_env_or_default("SOUK_REVIEWS_DATABASE_URL", "sqlite://reviews.db");
        let host = get_env_or_default("SOUK_REVIEWS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SOUK_REVIEWS_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("SOUK_REVIEWS_PORT", "7004")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SOUK_REVIEWS_PORT".to_string(), e.to_string())
            })?;

        let jwt_secret = std::env::var("SOUK_JWT_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("SOUK_JWT_SECRET".to_string()))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::InvalidEnvVar(
                "SOUK_JWT_SECRET".to_string(),
                format!("must be at least {MIN_JWT_SECRET_LENGTH} characters"),
            ));
        }

        let jwt_ttl_minutes = get_env_or_default("SOUK_JWT_TTL_MINUTES", "1440")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SOUK_JWT_TTL_MINUTES".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret: SecretString::from(jwt_secret),
            jwt_ttl_minutes,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ReviewsConfig {
            database_url: "sqlite://reviews.db".to_string(),
            host: "127.0.0.1".parse().unwrap(),
            port: 7004,
            jwt_secret: SecretString::from("0123456789abcdef0123456789abcdef"),
            jwt_ttl_minutes: 1440,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 7004);
    }
}
