/// Brand profile endpoints
///
/// # Endpoints
///
/// - `GET /api/brand` - Fetch the caller's brand profile
/// - `POST /api/brand` - Create-or-update (upsert); calling it twice for
///   the same user results in exactly one row

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{require_feature, required_str},
};
use axum::{extract::State, Extension, Json};
use brandloom_shared::{
    access::Feature,
    auth::middleware::AuthContext,
    models::brand_profile::{BrandProfile, UpsertBrandProfile},
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Upsert brand profile request
#[derive(Debug, Deserialize)]
pub struct UpsertBrandRequest {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub colors: Option<JsonValue>,
    pub personality: Option<JsonValue>,
    pub voice: Option<JsonValue>,
    pub target_audience: Option<String>,
    pub competitors: Option<JsonValue>,
}

/// Brand profile response wrapper
#[derive(Debug, Serialize)]
pub struct BrandResponse {
    /// The profile; None when the caller has not created one yet
    pub brand: Option<BrandProfile>,
}

/// Fetch the caller's brand profile
///
/// A brand-new account gets `{"brand": null}`, not an error.
pub async fn get_brand(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<BrandResponse>> {
    require_feature(&auth, Feature::Brand)?;

    let brand = BrandProfile::find_by_user(&state.db, auth.user_id).await?;

    Ok(Json(BrandResponse { brand }))
}

/// Create or update the caller's brand profile
pub async fn upsert_brand(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpsertBrandRequest>,
) -> ApiResult<Json<BrandResponse>> {
    require_feature(&auth, Feature::Brand)?;

    let name = required_str(req.name, "name")?;

    let brand = BrandProfile::upsert(
        &state.db,
        auth.user_id,
        UpsertBrandProfile {
            name,
            industry: req.industry,
            colors: req.colors.unwrap_or_else(|| serde_json::json!([])),
            personality: req.personality.unwrap_or_else(|| serde_json::json!({})),
            voice: req.voice.unwrap_or_else(|| serde_json::json!({})),
            target_audience: req.target_audience,
            competitors: req.competitors.unwrap_or_else(|| serde_json::json!([])),
        },
    )
    .await?;

    Ok(Json(BrandResponse { brand: Some(brand) }))
}
