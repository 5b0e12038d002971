/// Brand profile model and database operations
///
/// Each user has at most one brand profile describing their brand: name,
/// industry, colors, personality sliders, voice settings, target audience,
/// and competitors. The write path is an upsert — create-if-absent, else
/// update — so the one-row-per-user invariant is enforced by the UNIQUE
/// constraint on `user_id` rather than application logic.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE brand_profiles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     industry VARCHAR(255),
///     colors JSONB NOT NULL DEFAULT '[]',
///     personality JSONB NOT NULL DEFAULT '{}',
///     voice JSONB NOT NULL DEFAULT '{}',
///     target_audience TEXT,
///     competitors JSONB NOT NULL DEFAULT '[]',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::ownership::Owned;

/// Brand profile model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BrandProfile {
    /// Unique profile ID
    pub id: Uuid,

    /// Owning user (unique: at most one profile per user)
    pub user_id: Uuid,

    /// Brand name
    pub name: String,

    /// Industry label
    pub industry: Option<String>,

    /// Brand colors (JSON array of hex strings)
    pub colors: JsonValue,

    /// Personality slider values (JSON object, e.g. {"playful": 70})
    pub personality: JsonValue,

    /// Voice settings (JSON object, e.g. {"tone": "confident"})
    pub voice: JsonValue,

    /// Target audience description
    pub target_audience: Option<String>,

    /// Competitor list (JSON array of names)
    pub competitors: JsonValue,

    /// When the profile was created
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

impl Owned for BrandProfile {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Input for upserting a brand profile
#[derive(Debug, Clone)]
pub struct UpsertBrandProfile {
    /// Brand name
    pub name: String,

    /// Industry label
    pub industry: Option<String>,

    /// Brand colors
    pub colors: JsonValue,

    /// Personality slider values
    pub personality: JsonValue,

    /// Voice settings
    pub voice: JsonValue,

    /// Target audience description
    pub target_audience: Option<String>,

    /// Competitor list
    pub competitors: JsonValue,
}

const PROFILE_COLUMNS: &str = "id, user_id, name, industry, colors, personality, voice, \
                               target_audience, competitors, created_at, updated_at";

impl BrandProfile {
    /// Creates or updates the caller's brand profile
    ///
    /// A second upsert for the same user updates the existing row; it
    /// never inserts a duplicate.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        data: UpsertBrandProfile,
    ) -> Result<Self, sqlx::Error> {
        let profile = sqlx::query_as::<_, BrandProfile>(&format!(
            r#"
            INSERT INTO brand_profiles
                (user_id, name, industry, colors, personality, voice, target_audience, competitors)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                name = EXCLUDED.name,
                industry = EXCLUDED.industry,
                colors = EXCLUDED.colors,
                personality = EXCLUDED.personality,
                voice = EXCLUDED.voice,
                target_audience = EXCLUDED.target_audience,
                competitors = EXCLUDED.competitors,
                updated_at = NOW()
            RETURNING {PROFILE_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(data.name)
        .bind(data.industry)
        .bind(data.colors)
        .bind(data.personality)
        .bind(data.voice)
        .bind(data.target_audience)
        .bind(data.competitors)
        .fetch_one(pool)
        .await?;

        Ok(profile)
    }

    /// Finds the brand profile for a user
    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, BrandProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM brand_profiles WHERE user_id = $1",
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_returns_user_id() {
        let user_id = Uuid::new_v4();
        let profile = BrandProfile {
            id: Uuid::new_v4(),
            user_id,
            name: "Acme".to_string(),
            industry: None,
            colors: serde_json::json!([]),
            personality: serde_json::json!({}),
            voice: serde_json::json!({}),
            target_audience: None,
            competitors: serde_json::json!([]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(profile.owner_id(), user_id);
    }
}
