/// Post endpoints
///
/// # Endpoints
///
/// - `GET /api/posts` - List the caller's posts
///   (`?status=`, `?channel_id=`, `?campaign_id=` filters)
/// - `POST /api/posts` - Create a post (status defaults to draft)
/// - `PUT /api/posts` - Update a post (`id` in body)
/// - `DELETE /api/posts` - Delete a post (`id` in body)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{require_feature, required, required_str},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use brandloom_shared::{
    access::Feature,
    auth::{middleware::AuthContext, ownership::assert_owned},
    models::post::{CreatePost, Post, PostFilter, PostStatus, UpdatePost},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post list query filters
#[derive(Debug, Deserialize)]
pub struct PostQuery {
    pub status: Option<String>,
    pub channel_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
}

/// Create post request
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub channel_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: Option<String>,

    /// Lifecycle status; omitted means draft
    pub status: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Update post request; `id` names the target row
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub id: Option<Uuid>,
    pub channel_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub likes: Option<i32>,
    pub comments: Option<i32>,
    pub shares: Option<i32>,
}

/// Delete request; the id travels in the body
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: Option<Uuid>,
}

/// Post list response wrapper
#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
}

/// Single post response wrapper
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub post: Post,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Parses an optional status string, rejecting unknown values
fn parse_status(status: Option<String>) -> Result<Option<PostStatus>, ApiError> {
    match status {
        None => Ok(None),
        Some(s) => PostStatus::parse(&s)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest("status is invalid".to_string())),
    }
}

/// List the caller's posts
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PostQuery>,
) -> ApiResult<Json<PostsResponse>> {
    require_feature(&auth, Feature::Publishing)?;

    let filter = PostFilter {
        status: parse_status(query.status)?,
        channel_id: query.channel_id,
        campaign_id: query.campaign_id,
    };

    let posts = Post::list_by_user(&state.db, auth.user_id, filter).await?;

    Ok(Json(PostsResponse { posts }))
}

/// Create a post
///
/// A request without a `status` stores a draft.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    require_feature(&auth, Feature::Publishing)?;

    let content = required_str(req.content, "content")?;
    let status = parse_status(req.status)?.unwrap_or(PostStatus::Draft);

    let post = Post::create(
        &state.db,
        auth.user_id,
        CreatePost {
            channel_id: req.channel_id,
            campaign_id: req.campaign_id,
            title: req.title,
            content,
            status,
            scheduled_at: req.scheduled_at,
        },
    )
    .await?;

    Ok(Json(PostResponse { post }))
}

/// Update a post (ownership-guarded)
pub async fn update_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    require_feature(&auth, Feature::Publishing)?;

    let id = required(req.id, "id")?;

    let existing = Post::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    let post = Post::update(
        &state.db,
        id,
        UpdatePost {
            channel_id: req.channel_id,
            campaign_id: req.campaign_id,
            title: req.title,
            content: req.content,
            status: parse_status(req.status)?,
            scheduled_at: req.scheduled_at,
            published_at: req.published_at,
            likes: req.likes,
            comments: req.comments,
            shares: req.shares,
        },
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(PostResponse { post }))
}

/// Delete a post (ownership-guarded, hard delete)
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<DeleteRequest>,
) -> ApiResult<Json<DeleteResponse>> {
    require_feature(&auth, Feature::Publishing)?;

    let id = required(req.id, "id")?;

    let existing = Post::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    Post::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some("scheduled".to_string())).unwrap(),
            Some(PostStatus::Scheduled)
        );
        assert!(parse_status(Some("bogus".to_string())).is_err());
    }
}
