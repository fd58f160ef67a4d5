//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Posts returned per listing page (default: 6).
    pub page_size: u32,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Base URL of the hosted identity provider.
    pub identity_url: String,

    /// API key sent with every identity provider request.
    pub identity_api_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let page_size: u32 = env::var("PAGE_SIZE")
            .unwrap_or_else(|_| "6".to_string())
            .parse()
            .context("PAGE_SIZE must be a positive integer")?;
        if page_size == 0 {
            anyhow::bail!("PAGE_SIZE must be greater than zero");
        }

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let identity_url =
            env::var("IDENTITY_URL").context("IDENTITY_URL environment variable is required")?;

        let identity_api_key = env::var("IDENTITY_API_KEY")
            .context("IDENTITY_API_KEY environment variable is required")?;

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            page_size,
            cors_allowed_origins,
            identity_url,
            identity_api_key,
        })
    }
}
