//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::Config;
use crate::db;
use crate::posts::PostService;
use crate::services::identity::IdentityClient;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Post query engine and single-row operations.
    posts: PostService,

    /// Hosted identity provider client.
    identity: IdentityClient,
}

impl AppState {
    /// Create new application state with database connections.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;

        let posts = PostService::new(db.clone(), config.page_size);
        let identity = IdentityClient::new(&config.identity_url, &config.identity_api_key);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                db,
                posts,
                identity,
            }),
        })
    }

    /// Get the database pool.
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get the post service.
    pub fn posts(&self) -> &PostService {
        &self.inner.posts
    }

    /// Get the identity client.
    pub fn identity(&self) -> &IdentityClient {
        &self.inner.identity
    }

    /// Check if PostgreSQL is healthy.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
