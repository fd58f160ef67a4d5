//! Post row types and single-row operations.
//!
//! The listing path lives in [`crate::posts`]; everything here is a direct
//! pass-through keyed by id.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Read projection of a post joined with its category and author names.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Row identifier.
    pub id: i64,

    /// Cover image URL (object storage is external).
    pub image: String,

    /// Category name, when the category still resolves (left join).
    pub category: Option<String>,

    /// Post title.
    pub title: String,

    /// Short description shown in listings.
    pub description: String,

    /// Author display name, when the author still resolves (left join).
    pub author: Option<String>,

    /// Creation timestamp; listings order by this, newest first.
    pub created_at: DateTime<Utc>,

    /// Like counter (column `likes_count`).
    pub likes: i32,

    /// Full post body.
    pub content: String,
}

/// Input for creating a post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub image: String,
    pub category_id: i32,
    pub description: String,
    pub content: String,
    pub status_id: i32,
}

/// Input for updating a post (full-row replacement).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePost {
    pub title: String,
    pub image: String,
    pub category_id: i32,
    pub description: String,
    pub content: String,
    pub status_id: i32,
}

impl Post {
    /// Fetch the read projection for one post.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let post = sqlx::query_as::<_, Self>(
            r#"
            SELECT
                p.id,
                p.image,
                c.name AS category,
                p.title,
                p.description,
                u.name AS author,
                p.created_at,
                p.likes_count AS likes,
                p.content
            FROM posts p
            LEFT JOIN users u ON p.user_id = u.id
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch post")?;

        Ok(post)
    }

    /// Insert a new post row.
    pub async fn create(pool: &PgPool, input: CreatePost) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (title, image, category_id, description, content, status_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&input.title)
        .bind(&input.image)
        .bind(input.category_id)
        .bind(&input.description)
        .bind(&input.content)
        .bind(input.status_id)
        .execute(pool)
        .await
        .context("failed to create post")?;

        Ok(())
    }

    /// Replace a post row. Returns false when the id matched nothing.
    pub async fn update(pool: &PgPool, id: i64, input: UpdatePost) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $1, image = $2, category_id = $3, description = $4,
                content = $5, status_id = $6, updated_at = now()
            WHERE id = $7
            "#,
        )
        .bind(&input.title)
        .bind(&input.image)
        .bind(input.category_id)
        .bind(&input.description)
        .bind(&input.content)
        .bind(input.status_id)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update post")?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a post row. Returns false when the id matched nothing.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete post")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn post_serialization_keeps_optional_joins_null() {
        let post = Post {
            id: 1,
            image: "https://files.example/cover.jpg".to_string(),
            category: None,
            title: "Hello".to_string(),
            description: "First post".to_string(),
            author: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            likes: 0,
            content: "Body".to_string(),
        };

        let json = serde_json::to_value(&post).unwrap();
        assert!(json["category"].is_null());
        assert!(json["author"].is_null());
        assert_eq!(json["likes"], 0);
    }
}
