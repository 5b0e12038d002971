/// Campaign endpoints
///
/// # Endpoints
///
/// - `GET /api/campaigns` - List the caller's campaigns (`?status=` filter)
/// - `POST /api/campaigns` - Create a campaign (status defaults to draft)
/// - `PUT /api/campaigns` - Update a campaign (`id` in body)
/// - `DELETE /api/campaigns` - Delete a campaign (`id` in body; its posts
///   are detached, not removed)

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
    models::campaign::{Campaign, CampaignStatus, CreateCampaign, UpdateCampaign},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Campaign list query filters
#[derive(Debug, Deserialize)]
pub struct CampaignQuery {
    pub status: Option<String>,
}

/// Create campaign request
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: Option<String>,
    pub status: Option<String>,
    pub budget_cents: Option<i64>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub channels: Option<Vec<String>>,
}

/// Update campaign request; `id` names the target row
#[derive(Debug, Deserialize)]
pub struct UpdateCampaignRequest {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub budget_cents: Option<i64>,
    pub spent_cents: Option<i64>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub channels: Option<Vec<String>>,
}

/// Delete request; the id travels in the body
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: Option<Uuid>,
}

/// Campaign list response wrapper
#[derive(Debug, Serialize)]
pub struct CampaignsResponse {
    pub campaigns: Vec<Campaign>,
}

/// Single campaign response wrapper
#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub campaign: Campaign,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

fn parse_status(status: Option<String>) -> Result<Option<CampaignStatus>, ApiError> {
    match status {
        None => Ok(None),
        Some(s) => CampaignStatus::parse(&s)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest("status is invalid".to_string())),
    }
}

/// List the caller's campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<CampaignQuery>,
) -> ApiResult<Json<CampaignsResponse>> {
    require_feature(&auth, Feature::Campaigns)?;

    let campaigns =
        Campaign::list_by_user(&state.db, auth.user_id, parse_status(query.status)?).await?;

    Ok(Json(CampaignsResponse { campaigns }))
}

/// Create a campaign
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCampaignRequest>,
) -> ApiResult<Json<CampaignResponse>> {
    require_feature(&auth, Feature::Campaigns)?;

    let name = required_str(req.name, "name")?;
    let status = parse_status(req.status)?.unwrap_or(CampaignStatus::Draft);

    let campaign = Campaign::create(
        &state.db,
        auth.user_id,
        CreateCampaign {
            name,
            status,
            budget_cents: req.budget_cents.unwrap_or(0),
            starts_on: req.starts_on,
            ends_on: req.ends_on,
            channels: req.channels.unwrap_or_default(),
        },
    )
    .await?;

    Ok(Json(CampaignResponse { campaign }))
}

/// Update a campaign (ownership-guarded)
pub async fn update_campaign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateCampaignRequest>,
) -> ApiResult<Json<CampaignResponse>> {
    require_feature(&auth, Feature::Campaigns)?;

    let id = required(req.id, "id")?;

    let existing = Campaign::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    let campaign = Campaign::update(
        &state.db,
        id,
        UpdateCampaign {
            name: req.name,
            status: parse_status(req.status)?,
            budget_cents: req.budget_cents,
            spent_cents: req.spent_cents,
            starts_on: req.starts_on,
            ends_on: req.ends_on,
            channels: req.channels,
        },
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(CampaignResponse { campaign }))
}

/// Delete a campaign (ownership-guarded, hard delete)
pub async fn delete_campaign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<DeleteRequest>,
) -> ApiResult<Json<DeleteResponse>> {
    require_feature(&auth, Feature::Campaigns)?;

    let id = required(req.id, "id")?;

    let existing = Campaign::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    Campaign::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { success: true }))
}
