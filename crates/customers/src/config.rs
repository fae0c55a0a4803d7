//! Customers service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SOUK_CUSTOMERS_DATABASE_URL` - SQLite database URL
//!   (default: `sqlite://customers.db`)
//! - `SOUK_CUSTOMERS_HOST` - Bind address (default: 127.0.0.1)
//! - `SOUK_CUSTOMERS_PORT` - Listen port (default: 7001)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Customers service configuration.
#[derive(Debug, Clone)]
pub struct CustomersConfig {
    /// SQLite database URL.
    pub database_url: String,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
}

impl CustomersConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url =
            get_env_or_default("SOUK_CUSTOMERS_DATABASE_URL", "sqlite://customers.db");
        let host = get_env_or_default("SOUK_CUSTOMERS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SOUK_CUSTOMERS_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("SOUK_CUSTOMERS_PORT", "7001")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SOUK_CUSTOMERS_PORT".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
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
        let config = CustomersConfig {
            database_url: "sqlite://customers.db".to_string(),
            host: "127.0.0.1".parse().unwrap(),
            port: 7001,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 7001);
    }
}
