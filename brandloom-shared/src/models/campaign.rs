/// Campaign model and database operations
///
/// A campaign is a named marketing initiative with a status, a budget and
/// spend (stored in cents), a date range, and a target channel list.
/// Deleting a campaign does not touch its posts; their `campaign_id`
/// becomes NULL via the foreign key action.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::ownership::Owned;

/// Campaign lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }

    /// Parses status from its database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(CampaignStatus::Draft),
            "active" => Some(CampaignStatus::Active),
            "paused" => Some(CampaignStatus::Paused),
            "completed" => Some(CampaignStatus::Completed),
            _ => None,
        }
    }
}

/// Campaign model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Campaign {
    /// Unique campaign ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Campaign name
    pub name: String,

    /// Lifecycle status
    pub status: String,

    /// Planned budget in cents
    pub budget_cents: i64,

    /// Spend to date in cents
    pub spent_cents: i64,

    /// First day of the campaign
    pub starts_on: Option<NaiveDate>,

    /// Last day of the campaign
    pub ends_on: Option<NaiveDate>,

    /// Target channel platforms
    pub channels: Vec<String>,

    /// When the campaign was created
    pub created_at: DateTime<Utc>,

    /// When the campaign was last updated
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Gets the parsed status, defaulting to Draft
    pub fn get_status(&self) -> CampaignStatus {
        CampaignStatus::parse(&self.status).unwrap_or(CampaignStatus::Draft)
    }
}

impl Owned for Campaign {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Input for creating a campaign
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    pub name: String,
    pub status: CampaignStatus,
    pub budget_cents: i64,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub channels: Vec<String>,
}

/// Input for updating a campaign; only non-None fields are changed
#[derive(Debug, Clone, Default)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub status: Option<CampaignStatus>,
    pub budget_cents: Option<i64>,
    pub spent_cents: Option<i64>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub channels: Option<Vec<String>>,
}

const CAMPAIGN_COLUMNS: &str = "id, user_id, name, status, budget_cents, spent_cents, \
                                starts_on, ends_on, channels, created_at, updated_at";

impl Campaign {
    /// Creates a campaign for a user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateCampaign,
    ) -> Result<Self, sqlx::Error> {
        let campaign = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            INSERT INTO campaigns (user_id, name, status, budget_cents, starts_on, ends_on, channels)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CAMPAIGN_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(data.name)
        .bind(data.status.as_str())
        .bind(data.budget_cents)
        .bind(data.starts_on)
        .bind(data.ends_on)
        .bind(data.channels)
        .fetch_one(pool)
        .await?;

        Ok(campaign)
    }

    /// Finds a campaign by ID (ownership is checked by the caller)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let campaign = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(campaign)
    }

    /// Lists a user's campaigns, newest first, optionally by status
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let campaigns = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            SELECT {CAMPAIGN_COLUMNS}
            FROM campaigns
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await?;

        Ok(campaigns)
    }

    /// Patches a campaign; `updated_at` is refreshed
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCampaign,
    ) -> Result<Option<Self>, sqlx::Error> {
        let campaign = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            UPDATE campaigns
            SET name = COALESCE($2, name),
                status = COALESCE($3, status),
                budget_cents = COALESCE($4, budget_cents),
                spent_cents = COALESCE($5, spent_cents),
                starts_on = COALESCE($6, starts_on),
                ends_on = COALESCE($7, ends_on),
                channels = COALESCE($8, channels),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CAMPAIGN_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.status.map(|s| s.as_str()))
        .bind(data.budget_cents)
        .bind(data.spent_cents)
        .bind(data.starts_on)
        .bind(data.ends_on)
        .bind(data.channels)
        .fetch_optional(pool)
        .await?;

        Ok(campaign)
    }

    /// Deletes a campaign (hard delete; posts are detached, not removed)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            CampaignStatus::Draft,
            CampaignStatus::Active,
            CampaignStatus::Paused,
            CampaignStatus::Completed,
        ] {
            assert_eq!(CampaignStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CampaignStatus::parse("running"), None);
    }
}
