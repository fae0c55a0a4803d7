//! Inventory service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SOUK_INVENTORY_DATABASE_URL` - SQLite database URL
//!   (default: `sqlite://inventory.db`)
//! - `SOUK_INVENTORY_HOST` - Bind address (default: 127.0.0.1)
//! - `SOUK_INVENTORY_PORT` - Listen port (default: 7002)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Inventory service configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// SQLite database URL.
    pub database_url: String,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
}

impl InventoryConfig {
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
            get_env_or_default("SOUK_INVENTORY_DATABASE_URL", "sqlite://inventory.db");
        let host = get_env_or_default("SOUK_INVENTORY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SOUK_INVENTORY_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("SOUK_INVENTORY_PORT", "7002")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SOUK_INVENTORY_PORT".to_string(), e.to_string())
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
