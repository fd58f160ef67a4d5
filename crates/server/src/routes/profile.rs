//! Profile route handlers.
//!
//! Profile edits are scoped to the identity bound to the bearer token.
//! Avatar files live in external object storage; this endpoint only stores
//! the resulting URL.

use std::sync::LazyLock;

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::put,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::auth::bearer_token;
use crate::error::{AppError, AppResult};
use crate::models::{UpdateProfile, User};
use crate::state::AppState;

#[allow(clippy::unwrap_used)]
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

#[allow(clippy::unwrap_used)]
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").unwrap());

#[allow(clippy::unwrap_used)]
static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

/// Create the profile router.
pub fn router() -> Router<AppState> {
    Router::new().route("/profiles", put(update_profile))
}

/// Collapse whitespace and strip markup from a submitted field.
fn sanitize(text: &str) -> String {
    let stripped = HTML_TAG.replace_all(text.trim(), "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    name: Option<String>,
    username: Option<String>,
    profile_pic: Option<String>,
}

#[derive(Serialize)]
struct UpdateProfileResponse {
    message: &'static str,
    user: User,
}

async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<UpdateProfileResponse>> {
    let token = bearer_token(&headers)?;
    let identity = state.identity().get_user(token).await?;

    let mut updates = UpdateProfile::default();

    if let Some(name) = input.name {
        let name = sanitize(&name);

        if name.is_empty() || name.len() > 100 {
            return Err(AppError::BadRequest(
                "name must be between 1 and 100 characters".to_string(),
            ));
        }
        if !NAME_PATTERN.is_match(&name) {
            return Err(AppError::BadRequest(
                "name can only contain letters, spaces, apostrophes, and hyphens".to_string(),
            ));
        }

        updates.name = Some(name);
    }

    if let Some(username) = input.username {
        let username = sanitize(&username);

        if username.len() < 3 || username.len() > 50 {
            return Err(AppError::BadRequest(
                "username must be between 3 and 50 characters".to_string(),
            ));
        }
        if !USERNAME_PATTERN.is_match(&username) {
            return Err(AppError::BadRequest(
                "username can only contain letters, numbers, underscores, and hyphens".to_string(),
            ));
        }
        if User::username_taken(state.db(), &username, Some(identity.id)).await? {
            return Err(AppError::BadRequest(
                "this username is already taken".to_string(),
            ));
        }

        updates.username = Some(username);
    }

    if let Some(profile_pic) = input.profile_pic {
        let profile_pic = profile_pic.trim().to_string();
        if profile_pic.is_empty() {
            return Err(AppError::BadRequest(
                "profile picture URL cannot be empty".to_string(),
            ));
        }
        updates.profile_pic = Some(profile_pic);
    }

    let user = User::update_profile(state.db(), identity.id, updates)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(UpdateProfileResponse {
        message: "profile updated successfully",
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_whitespace_and_strips_tags() {
        assert_eq!(sanitize("  Jane   Doe  "), "Jane Doe");
        assert_eq!(sanitize("Jane <b>Doe</b>"), "Jane Doe");
        assert_eq!(sanitize("<script>x</script>"), "x");
    }

    #[test]
    fn name_pattern() {
        assert!(NAME_PATTERN.is_match("Jane O'Brien-Smith"));
        assert!(!NAME_PATTERN.is_match("jane42"));
    }

    #[test]
    fn username_pattern() {
        assert!(USERNAME_PATTERN.is_match("jane_doe-42"));
        assert!(!USERNAME_PATTERN.is_match("jane doe"));
        assert!(!USERNAME_PATTERN.is_match("jane!"));
    }
}
