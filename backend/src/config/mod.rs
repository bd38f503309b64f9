//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, and token signing material. Everything is
//! read from the environment exactly once at startup and passed down
//! explicitly; no module reads environment variables at use sites.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub auth: AuthConfig,
    pub server_port: u16,
}

/// The slice of configuration consumed by the auth service: the token
/// signing secret and the token lifetime.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_signing_key: String,
    /// Token lifetime, applied in hours (not seconds).
    pub token_expiry_hours: i64,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_signing_key = env::var("JWT_SIGNING_KEY").context("JWT_SIGNING_KEY not set")?;

        let token_expiry_hours = env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<i64>()
            .context("JWT_EXPIRY_HOURS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            auth: AuthConfig {
                jwt_signing_key,
                token_expiry_hours,
            },
            server_port,
        })
    }
}
