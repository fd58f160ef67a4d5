//! Auth route handlers.
//!
//! Credential handling is delegated to the hosted identity provider; these
//! handlers orchestrate the delegation and keep the local profile row in
//! sync with the provider-assigned identity.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::state::AppState;

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/get-user", get(get_user))
        .route("/auth/reset-password", put(reset_password))
}

/// Pull the bearer token out of the Authorization header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: String,
    password: String,
    username: String,
    name: String,
}

#[derive(Serialize)]
struct RegisterResponse {
    message: &'static str,
    user: User,
}

async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    if User::username_taken(state.db(), &input.username, None).await? {
        return Err(AppError::BadRequest(
            "this username is already taken".to_string(),
        ));
    }

    // The provider owns the credentials; we only keep the profile row.
    let identity = state
        .identity()
        .sign_up(&input.email, &input.password)
        .await?;

    let user = User::create(state.db(), identity.id, &input.username, &input.name, "user").await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user created successfully",
            user,
        }),
    ))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    message: &'static str,
    access_token: String,
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let access_token = state
        .identity()
        .sign_in(&input.email, &input.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "signed in successfully",
        access_token,
    }))
}

#[derive(Serialize)]
struct CurrentUserResponse {
    id: Uuid,
    email: String,
    username: String,
    name: String,
    role: String,
    profile_pic: Option<String>,
}

async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<CurrentUserResponse>> {
    let token = bearer_token(&headers)?;

    let identity = state.identity().get_user(token).await?;

    let user = User::find_by_id(state.db(), identity.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(CurrentUserResponse {
        id: user.id,
        email: identity.email,
        username: user.username,
        name: user.name,
        role: user.role,
        profile_pic: user.profile_pic,
    }))
}

#[derive(Debug, Deserialize)]
struct ResetPasswordRequest {
    old_password: String,
    new_password: String,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn reset_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let token = bearer_token(&headers)?;

    if input.new_password.trim().is_empty() {
        return Err(AppError::BadRequest("new password is required".to_string()));
    }

    let identity = state.identity().get_user(token).await?;

    // Re-authenticate with the old password before allowing the change.
    if state
        .identity()
        .sign_in(&identity.email, &input.old_password)
        .await
        .is_err()
    {
        return Err(AppError::BadRequest("invalid old password".to_string()));
    }

    state
        .identity()
        .update_password(token, &input.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "password updated successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer abc123"));

        assert!(matches!(bearer_token(&headers), Ok("abc123")));
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn non_bearer_scheme_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic abc123"));

        assert!(bearer_token(&headers).is_err());
    }
}
