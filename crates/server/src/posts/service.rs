//! Post listing execution and single-row pass-throughs.

use anyhow::{Context, Result};
use sqlx::PgPool;

use super::query_builder::PostQueryBuilder;
use super::types::{PostFilter, PostPage};
use crate::models::{CreatePost, Post, UpdatePost};

/// Service executing post queries against the injected pool.
pub struct PostService {
    pool: PgPool,
    page_size: u32,
}

impl PostService {
    /// Create a new post service over the given pool.
    pub fn new(pool: PgPool, page_size: u32) -> Self {
        Self { pool, page_size }
    }

    /// Page size this service paginates with.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Execute the filtered, paginated listing.
    ///
    /// The count and data statements are independent reads issued
    /// concurrently. They are not one transaction, so writes landing
    /// between them can leave `total_posts` slightly out of step with the
    /// returned window.
    pub async fn list(&self, filter: PostFilter) -> Result<PostPage<Post>> {
        let page = filter.page;
        let builder = PostQueryBuilder::new(filter);

        let (count_sql, count_values) = builder.build_count();
        let (data_sql, data_values) = builder.build(self.page_size);

        let count_fut = async {
            sqlx::query_scalar_with::<_, i64, _>(&count_sql, count_values)
                .fetch_one(&self.pool)
                .await
                .context("failed to execute post count query")
        };
        let data_fut = async {
            sqlx::query_as_with::<_, Post, _>(&data_sql, data_values)
                .fetch_all(&self.pool)
                .await
                .context("failed to execute post listing query")
        };

        let (total, posts) = tokio::try_join!(count_fut, data_fut)?;

        Ok(PostPage::new(
            posts,
            total.max(0) as u64,
            page,
            self.page_size,
        ))
    }

    /// Fetch a single post projection by id.
    pub async fn get(&self, id: i64) -> Result<Option<Post>> {
        Post::find_by_id(&self.pool, id).await
    }

    /// Insert a new post row.
    pub async fn create(&self, input: CreatePost) -> Result<()> {
        Post::create(&self.pool, input).await
    }

    /// Replace a post row. Returns false when the id matched nothing.
    pub async fn update(&self, id: i64, input: UpdatePost) -> Result<bool> {
        Post::update(&self.pool, id, input).await
    }

    /// Delete a post row. Returns false when the id matched nothing.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        Post::delete(&self.pool, id).await
    }
}
