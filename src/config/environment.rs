// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration management
//!
//! Configuration is environment-only: `HTTP_PORT`, `DATABASE_URL` and
//! `CORS_ALLOWED_ORIGINS`. Every value has a development-friendly default so
//! the server starts with no configuration at all.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default database URL when `DATABASE_URL` is unset
const DEFAULT_DATABASE_URL: &str = "sqlite:codecamp.db";

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP server listens on
    pub http_port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// CORS settings
    pub cors: CorsConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection string, e.g. `sqlite:codecamp.db` or `sqlite::memory:`
    pub url: String,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated origin list, or "*" to allow any origin
    pub allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.into(),
            },
            cors: CorsConfig {
                allowed_origins: "*".into(),
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("Invalid HTTP_PORT value: {value}"))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());
        let allowed_origins = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".into());

        Ok(Self {
            http_port,
            database: DatabaseConfig { url },
            cors: CorsConfig { allowed_origins },
        })
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} database={} cors_origins={}",
            self.http_port, self.database.url, self.cors.allowed_origins
        )
    }
}
