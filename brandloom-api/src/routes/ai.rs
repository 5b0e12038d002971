/// AI content assist endpoints
///
/// Both routes format a prompt from the caller's brand profile and recent
/// posts, call the configured completion provider, and on provider failure
/// substitute the canned mock reply. One catch, no retry.
///
/// # Endpoints
///
/// - `POST /api/ai` - Generate post content for a topic
/// - `POST /api/ai/edit` - Rewrite content per an instruction

use crate::{
    ai::{mock::MockCompletionProvider, prompt, CompletionRequest},
    app::AppState,
    error::ApiResult,
    routes::{require_feature, required_str},
};
use axum::{extract::State, Extension, Json};
use brandloom_shared::{
    access::Feature,
    auth::middleware::AuthContext,
    models::{ai_settings::AiSettings, brand_profile::BrandProfile, post::Post},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Generate request
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// What the post should be about
    pub topic: Option<String>,
}

/// Edit request
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    /// The content to rewrite
    pub content: Option<String>,

    /// How to rewrite it
    pub instruction: Option<String>,
}

/// AI response wrapper
#[derive(Debug, Serialize)]
pub struct AiResponse {
    /// The generated or rewritten content
    pub content: String,

    /// Which provider produced it ("http" or "mock")
    pub provider: String,
}

/// Runs a completion, substituting the canned reply on failure
async fn complete_with_fallback(state: &AppState, request: CompletionRequest) -> (String, String) {
    match state.ai.complete(&request).await {
        Ok(content) => (content, state.ai.name().to_string()),
        Err(e) => {
            warn!(provider = state.ai.name(), error = %e, "Completion failed, serving canned reply");
            (
                MockCompletionProvider::reply_for(&request.prompt).to_string(),
                "mock".to_string(),
            )
        }
    }
}

/// Generate post content for a topic
pub async fn generate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<AiResponse>> {
    require_feature(&auth, Feature::Agent)?;

    let topic = required_str(req.topic, "topic")?;

    let brand = BrandProfile::find_by_user(&state.db, auth.user_id).await?;
    let recent = Post::list_recent(&state.db, auth.user_id, prompt::RECENT_POST_CONTEXT).await?;
    let settings = AiSettings::find_or_default(&state.db, auth.user_id).await?;

    let request = CompletionRequest {
        system: Some(prompt::system_prompt(brand.as_ref())),
        prompt: prompt::generation_prompt(&topic, &recent),
        model: settings.model,
        temperature: settings.temperature,
    };

    let (content, provider) = complete_with_fallback(&state, request).await;

    Ok(Json(AiResponse { content, provider }))
}

/// Rewrite content per an instruction
pub async fn edit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<EditRequest>,
) -> ApiResult<Json<AiResponse>> {
    require_feature(&auth, Feature::Agent)?;

    let content = required_str(req.content, "content")?;
    let instruction = required_str(req.instruction, "instruction")?;

    let brand = BrandProfile::find_by_user(&state.db, auth.user_id).await?;
    let settings = AiSettings::find_or_default(&state.db, auth.user_id).await?;

    let request = CompletionRequest {
        system: Some(prompt::system_prompt(brand.as_ref())),
        prompt: prompt::edit_prompt(&content, &instruction),
        model: settings.model,
        temperature: settings.temperature,
    };

    let (content, provider) = complete_with_fallback(&state, request).await;

    Ok(Json(AiResponse { content, provider }))
}
