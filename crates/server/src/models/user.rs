//! User profile rows.
//!
//! Credentials live with the external identity provider; this table only
//! carries profile data keyed by the provider-assigned id.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A user profile row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Identity-provider-assigned identifier.
    pub id: Uuid,

    /// Unique handle.
    pub username: String,

    /// Display name.
    pub name: String,

    /// Role label ("user", "admin").
    pub role: String,

    /// Avatar URL, when one has been set.
    pub profile_pic: Option<String>,
}

/// Input for a partial profile update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub username: Option<String>,
    pub profile_pic: Option<String>,
}

impl User {
    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, Self>(
            "SELECT id, username, name, role, profile_pic FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user")?;

        Ok(user)
    }

    /// Check whether a username is already held by another user.
    pub async fn username_taken(
        pool: &PgPool,
        username: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool> {
        let taken: bool = match exclude {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id != $2)",
                )
                .bind(username)
                .bind(id)
                .fetch_one(pool)
                .await
            }
            None => {
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                    .bind(username)
                    .fetch_one(pool)
                    .await
            }
        }
        .context("failed to check username")?;

        Ok(taken)
    }

    /// Create a profile row for a freshly registered identity.
    pub async fn create(
        pool: &PgPool,
        id: Uuid,
        username: &str,
        name: &str,
        role: &str,
    ) -> Result<Self> {
        let user = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (id, username, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, name, role, profile_pic
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(name)
        .bind(role)
        .fetch_one(pool)
        .await
        .context("failed to create user")?;

        Ok(user)
    }

    /// Apply a partial profile update. Returns None when the user is missing.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        input: UpdateProfile,
    ) -> Result<Option<Self>> {
        let Some(current) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let username = input.username.unwrap_or(current.username);
        let name = input.name.unwrap_or(current.name);
        let profile_pic = input.profile_pic.or(current.profile_pic);

        let user = sqlx::query_as::<_, Self>(
            r#"
            UPDATE users
            SET username = $1, name = $2, profile_pic = $3
            WHERE id = $4
            RETURNING id, username, name, role, profile_pic
            "#,
        )
        .bind(&username)
        .bind(&name)
        .bind(&profile_pic)
        .bind(id)
        .fetch_one(pool)
        .await
        .context("failed to update user")?;

        Ok(Some(user))
    }
}
