/// AI settings endpoints
///
/// # Endpoints
///
/// - `GET /api/settings` - Fetch the caller's AI settings; a user who has
///   never saved any gets the defaults, not an error
/// - `POST /api/settings` - Create-or-update (upsert)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::require_feature,
};
use axum::{extract::State, Extension, Json};
use brandloom_shared::{
    access::Feature,
    auth::middleware::AuthContext,
    models::ai_settings::{AiSettings, UpsertAiSettings},
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Upsert settings request; omitted fields take the defaults
#[derive(Debug, Deserialize)]
pub struct UpsertSettingsRequest {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub capabilities: Option<JsonValue>,
}

/// Settings response wrapper
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: AiSettings,
}

/// Fetch the caller's AI settings (defaults when never saved)
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<SettingsResponse>> {
    require_feature(&auth, Feature::Settings)?;

    let settings = AiSettings::find_or_default(&state.db, auth.user_id).await?;

    Ok(Json(SettingsResponse { settings }))
}

/// Create or update the caller's AI settings
pub async fn upsert_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpsertSettingsRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    require_feature(&auth, Feature::Settings)?;

    let defaults = UpsertAiSettings::default();

    let temperature = req.temperature.unwrap_or(defaults.temperature);
    if !(0.0..=2.0).contains(&temperature) {
        return Err(ApiError::BadRequest(
            "temperature must be between 0 and 2".to_string(),
        ));
    }

    let settings = AiSettings::upsert(
        &state.db,
        auth.user_id,
        UpsertAiSettings {
            provider: req.provider.unwrap_or(defaults.provider),
            model: req.model.unwrap_or(defaults.model),
            temperature,
            capabilities: req.capabilities.unwrap_or(defaults.capabilities),
        },
    )
    .await?;

    Ok(Json(SettingsResponse { settings }))
}
