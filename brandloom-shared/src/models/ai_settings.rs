/// AI settings model and database operations
///
/// One-per-user AI provider configuration: provider, model, sampling
/// temperature, and capability toggles. Like the brand profile, the write
/// path is an upsert and the one-row-per-user invariant lives in the
/// UNIQUE constraint on `user_id`.
///
/// A user who has never saved settings gets [`AiSettings::defaults`]
/// rather than an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::ownership::Owned;

/// AI settings model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AiSettings {
    /// Unique settings row ID
    pub id: Uuid,

    /// Owning user (unique)
    pub user_id: Uuid,

    /// Provider key (e.g. "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Capability toggles (JSON object, e.g. {"suggestions": true})
    pub capabilities: JsonValue,

    /// When the settings were created
    pub created_at: DateTime<Utc>,

    /// When the settings were last updated
    pub updated_at: DateTime<Utc>,
}

impl Owned for AiSettings {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Input for upserting AI settings
#[derive(Debug, Clone)]
pub struct UpsertAiSettings {
    pub provider: String,
    pub model: String,
    pub temperature: f64,
    pub capabilities: JsonValue,
}

impl Default for UpsertAiSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            capabilities: serde_json::json!({}),
        }
    }
}

const SETTINGS_COLUMNS: &str =
    "id, user_id, provider, model, temperature, capabilities, created_at, updated_at";

impl AiSettings {
    /// Default settings for a user who has never saved any
    ///
    /// Not persisted; the returned row carries a nil id.
    pub fn defaults(user_id: Uuid) -> Self {
        let defaults = UpsertAiSettings::default();
        let now = Utc::now();

        Self {
            id: Uuid::nil(),
            user_id,
            provider: defaults.provider,
            model: defaults.model,
            temperature: defaults.temperature,
            capabilities: defaults.capabilities,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates or updates the caller's AI settings
    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        data: UpsertAiSettings,
    ) -> Result<Self, sqlx::Error> {
        let settings = sqlx::query_as::<_, AiSettings>(&format!(
            r#"
            INSERT INTO ai_settings (user_id, provider, model, temperature, capabilities)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                provider = EXCLUDED.provider,
                model = EXCLUDED.model,
                temperature = EXCLUDED.temperature,
                capabilities = EXCLUDED.capabilities,
                updated_at = NOW()
            RETURNING {SETTINGS_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(data.provider)
        .bind(data.model)
        .bind(data.temperature)
        .bind(data.capabilities)
        .fetch_one(pool)
        .await?;

        Ok(settings)
    }

    /// Finds the AI settings for a user
    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let settings = sqlx::query_as::<_, AiSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM ai_settings WHERE user_id = $1",
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(settings)
    }

    /// Finds the settings for a user, falling back to defaults
    pub async fn find_or_default(pool: &PgPool, user_id: Uuid) -> Result<Self, sqlx::Error> {
        Ok(Self::find_by_user(pool, user_id)
            .await?
            .unwrap_or_else(|| Self::defaults(user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let user_id = Uuid::new_v4();
        let settings = AiSettings::defaults(user_id);

        assert_eq!(settings.user_id, user_id);
        assert_eq!(settings.provider, "openai");
        assert_eq!(settings.model, "gpt-4o-mini");
        assert!((settings.temperature - 0.7).abs() < f64::EPSILON);
        assert!(settings.id.is_nil());
    }
}
