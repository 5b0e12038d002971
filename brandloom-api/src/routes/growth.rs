/// Growth experiment endpoints
///
/// # Endpoints
///
/// - `GET /api/growth` - List the caller's experiments (`?status=` filter)
/// - `POST /api/growth` - Create an experiment (status defaults to idea)
/// - `PUT /api/growth` - Update an experiment (`id` in body)
/// - `DELETE /api/growth` - Delete an experiment (`id` in body)

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
    models::growth_experiment::{
        CreateGrowthExperiment, ExperimentStatus, GrowthExperiment, UpdateGrowthExperiment,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Experiment list query filters
#[derive(Debug, Deserialize)]
pub struct ExperimentQuery {
    pub status: Option<String>,
}

/// Create experiment request
#[derive(Debug, Deserialize)]
pub struct CreateExperimentRequest {
    pub name: Option<String>,
    pub hypothesis: Option<String>,
    pub status: Option<String>,
    pub metrics: Option<JsonValue>,
}

/// Update experiment request; `id` names the target row
#[derive(Debug, Deserialize)]
pub struct UpdateExperimentRequest {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub hypothesis: Option<String>,
    pub status: Option<String>,
    pub metrics: Option<JsonValue>,
}

/// Delete request; the id travels in the body
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: Option<Uuid>,
}

/// Experiment list response wrapper
#[derive(Debug, Serialize)]
pub struct ExperimentsResponse {
    pub experiments: Vec<GrowthExperiment>,
}

/// Single experiment response wrapper
#[derive(Debug, Serialize)]
pub struct ExperimentResponse {
    pub experiment: GrowthExperiment,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

fn parse_status(status: Option<String>) -> Result<Option<ExperimentStatus>, ApiError> {
    match status {
        None => Ok(None),
        Some(s) => ExperimentStatus::parse(&s)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest("status is invalid".to_string())),
    }
}

/// List the caller's experiments
pub async fn list_experiments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ExperimentQuery>,
) -> ApiResult<Json<ExperimentsResponse>> {
    require_feature(&auth, Feature::Growth)?;

    let experiments =
        GrowthExperiment::list_by_user(&state.db, auth.user_id, parse_status(query.status)?)
            .await?;

    Ok(Json(ExperimentsResponse { experiments }))
}

/// Create an experiment
pub async fn create_experiment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateExperimentRequest>,
) -> ApiResult<Json<ExperimentResponse>> {
    require_feature(&auth, Feature::Growth)?;

    let name = required_str(req.name, "name")?;
    let status = parse_status(req.status)?.unwrap_or(ExperimentStatus::Idea);

    let experiment = GrowthExperiment::create(
        &state.db,
        auth.user_id,
        CreateGrowthExperiment {
            name,
            hypothesis: req.hypothesis,
            status,
            metrics: req.metrics.unwrap_or_else(|| serde_json::json!({})),
        },
    )
    .await?;

    Ok(Json(ExperimentResponse { experiment }))
}

/// Update an experiment (ownership-guarded)
pub async fn update_experiment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateExperimentRequest>,
) -> ApiResult<Json<ExperimentResponse>> {
    require_feature(&auth, Feature::Growth)?;

    let id = required(req.id, "id")?;

    let existing = GrowthExperiment::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    let experiment = GrowthExperiment::update(
        &state.db,
        id,
        UpdateGrowthExperiment {
            name: req.name,
            hypothesis: req.hypothesis,
            status: parse_status(req.status)?,
            metrics: req.metrics,
        },
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(ExperimentResponse { experiment }))
}

/// Delete an experiment (ownership-guarded, hard delete)
pub async fn delete_experiment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<DeleteRequest>,
) -> ApiResult<Json<DeleteResponse>> {
    require_feature(&auth, Feature::Growth)?;

    let id = required(req.id, "id")?;

    let existing = GrowthExperiment::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    GrowthExperiment::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { success: true }))
}
