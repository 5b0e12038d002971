/// Channel endpoints
///
/// # Endpoints
///
/// - `GET /api/channels` - List the caller's channels (`?platform=` filter)
/// - `POST /api/channels` - Connect a channel
/// - `PUT /api/channels` - Update a channel (`id` in body)
/// - `DELETE /api/channels` - Disconnect a channel (`id` in body)

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{require_feature, required, required_str},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use brandloom_shared::{
    access::Feature,
    auth::{middleware::AuthContext, ownership::assert_owned},
    models::channel::{Channel, CreateChannel, UpdateChannel},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Channel list query filters
#[derive(Debug, Deserialize)]
pub struct ChannelQuery {
    pub platform: Option<String>,
}

/// Connect channel request
#[derive(Debug, Deserialize)]
pub struct CreateChannelRequest {
    pub platform: Option<String>,
    pub handle: Option<String>,
    pub active: Option<bool>,
    pub followers: Option<i32>,
}

/// Update channel request; `id` names the target row
#[derive(Debug, Deserialize)]
pub struct UpdateChannelRequest {
    pub id: Option<Uuid>,
    pub platform: Option<String>,
    pub handle: Option<String>,
    pub active: Option<bool>,
    pub followers: Option<i32>,
}

/// Delete request; the id travels in the body
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: Option<Uuid>,
}

/// Channel list response wrapper
#[derive(Debug, Serialize)]
pub struct ChannelsResponse {
    pub channels: Vec<Channel>,
}

/// Single channel response wrapper
#[derive(Debug, Serialize)]
pub struct ChannelResponse {
    pub channel: Channel,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// List the caller's channels
pub async fn list_channels(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ChannelQuery>,
) -> ApiResult<Json<ChannelsResponse>> {
    require_feature(&auth, Feature::Channels)?;

    let channels =
        Channel::list_by_user(&state.db, auth.user_id, query.platform.as_deref()).await?;

    Ok(Json(ChannelsResponse { channels }))
}

/// Connect a channel
pub async fn create_channel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateChannelRequest>,
) -> ApiResult<Json<ChannelResponse>> {
    require_feature(&auth, Feature::Channels)?;

    let platform = required_str(req.platform, "platform")?;
    let handle = required_str(req.handle, "handle")?;

    let channel = Channel::create(
        &state.db,
        auth.user_id,
        CreateChannel {
            platform,
            handle,
            active: req.active.unwrap_or(true),
            followers: req.followers.unwrap_or(0),
        },
    )
    .await?;

    Ok(Json(ChannelResponse { channel }))
}

/// Update a channel (ownership-guarded)
pub async fn update_channel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateChannelRequest>,
) -> ApiResult<Json<ChannelResponse>> {
    require_feature(&auth, Feature::Channels)?;

    let id = required(req.id, "id")?;

    let existing = Channel::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    let channel = Channel::update(
        &state.db,
        id,
        UpdateChannel {
            platform: req.platform,
            handle: req.handle,
            active: req.active,
            followers: req.followers,
        },
    )
    .await?
    .ok_or(crate::error::ApiError::NotFound)?;

    Ok(Json(ChannelResponse { channel }))
}

/// Disconnect a channel (ownership-guarded, hard delete)
pub async fn delete_channel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<DeleteRequest>,
) -> ApiResult<Json<DeleteResponse>> {
    require_feature(&auth, Feature::Channels)?;

    let id = required(req.id, "id")?;

    let existing = Channel::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    Channel::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { success: true }))
}
