//! Post CRUD route handlers.
//!
//! The listing endpoint accepts untrusted filter input and normalizes it
//! instead of rejecting it; write endpoints validate an explicit request
//! struct before touching storage.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{CreatePost, Post, UpdatePost};
use crate::posts::{PostFilter, PostPage};
use crate::state::AppState;

/// Create the post router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts", post(create_post))
        .route("/posts/{id}", get(get_post))
        .route("/posts/{id}", put(update_post))
        .route("/posts/{id}", delete(delete_post))
}

/// Raw listing filters.
///
/// `page` stays text so malformed input can default to page 1 instead of
/// failing deserialization.
#[derive(Debug, Deserialize)]
struct ListPostsQuery {
    category: Option<String>,
    keyword: Option<String>,
    page: Option<String>,
}

/// Response for write operations.
#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// Request body for creating or replacing a post.
#[derive(Debug, Deserialize)]
struct PostRequest {
    title: String,
    image: String,
    category_id: i32,
    description: String,
    content: String,
    status_id: i32,
}

impl PostRequest {
    /// Reject blank text fields and non-positive ids.
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        if self.image.trim().is_empty() {
            return Err(AppError::BadRequest("image URL is required".to_string()));
        }
        if self.category_id <= 0 {
            return Err(AppError::BadRequest(
                "valid category id is required".to_string(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::BadRequest("description is required".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::BadRequest("content is required".to_string()));
        }
        if self.status_id <= 0 {
            return Err(AppError::BadRequest(
                "valid status id is required".to_string(),
            ));
        }
        Ok(())
    }

    fn into_create(self) -> CreatePost {
        CreatePost {
            title: self.title,
            image: self.image,
            category_id: self.category_id,
            description: self.description,
            content: self.content,
            status_id: self.status_id,
        }
    }

    fn into_update(self) -> UpdatePost {
        UpdatePost {
            title: self.title,
            image: self.image,
            category_id: self.category_id,
            description: self.description,
            content: self.content,
            status_id: self.status_id,
        }
    }
}

async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListPostsQuery>,
) -> AppResult<Json<PostPage<Post>>> {
    let filter = PostFilter::from_raw(
        params.category.as_deref(),
        params.keyword.as_deref(),
        params.page.as_deref(),
    );

    let page = state.posts().list(filter).await?;

    Ok(Json(page))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Post>> {
    let post = state.posts().get(id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(post))
}

async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<PostRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    input.validate()?;

    state.posts().create(input.into_create()).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "created post successfully",
        }),
    ))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PostRequest>,
) -> AppResult<Json<MessageResponse>> {
    input.validate()?;

    if !state.posts().update(id, input.into_update()).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(MessageResponse {
        message: "updated post successfully",
    }))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if !state.posts().delete(id).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PostRequest {
        PostRequest {
            title: "A title".to_string(),
            image: "https://files.example/cover.jpg".to_string(),
            category_id: 1,
            description: "A description".to_string(),
            content: "Some content".to_string(),
            status_id: 1,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn blank_title_rejected() {
        let mut req = request();
        req.title = "   ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_image_rejected() {
        let mut req = request();
        req.image = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn nonpositive_category_rejected() {
        let mut req = request();
        req.category_id = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_description_rejected() {
        let mut req = request();
        req.description = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_content_rejected() {
        let mut req = request();
        req.content = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn nonpositive_status_rejected() {
        let mut req = request();
        req.status_id = -1;
        assert!(req.validate().is_err());
    }
}
