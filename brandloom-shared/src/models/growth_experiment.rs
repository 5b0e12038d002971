/// Growth experiment model and database operations
///
/// An A/B-style experiment: a hypothesis, a lifecycle status, and a
/// free-form metrics blob the dashboard charts from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::ownership::Owned;

/// Experiment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentStatus {
    Idea,
    Active,
    Paused,
    Completed,
}

impl ExperimentStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperimentStatus::Idea => "idea",
            ExperimentStatus::Active => "active",
            ExperimentStatus::Paused => "paused",
            ExperimentStatus::Completed => "completed",
        }
    }

    /// Parses status from its database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idea" => Some(ExperimentStatus::Idea),
            "active" => Some(ExperimentStatus::Active),
            "paused" => Some(ExperimentStatus::Paused),
            "completed" => Some(ExperimentStatus::Completed),
            _ => None,
        }
    }
}

/// Growth experiment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GrowthExperiment {
    /// Unique experiment ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Experiment name
    pub name: String,

    /// What the experiment is testing
    pub hypothesis: Option<String>,

    /// Lifecycle status
    pub status: String,

    /// Metrics blob (JSON object)
    pub metrics: JsonValue,

    /// When the experiment was created
    pub created_at: DateTime<Utc>,

    /// When the experiment was last updated
    pub updated_at: DateTime<Utc>,
}

impl Owned for GrowthExperiment {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Input for creating an experiment
#[derive(Debug, Clone)]
pub struct CreateGrowthExperiment {
    pub name: String,
    pub hypothesis: Option<String>,
    pub status: ExperimentStatus,
    pub metrics: JsonValue,
}

/// Input for updating an experiment; only non-None fields are changed
#[derive(Debug, Clone, Default)]
pub struct UpdateGrowthExperiment {
    pub name: Option<String>,
    pub hypothesis: Option<String>,
    pub status: Option<ExperimentStatus>,
    pub metrics: Option<JsonValue>,
}

const EXPERIMENT_COLUMNS: &str =
    "id, user_id, name, hypothesis, status, metrics, created_at, updated_at";

impl GrowthExperiment {
    /// Creates an experiment for a user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateGrowthExperiment,
    ) -> Result<Self, sqlx::Error> {
        let experiment = sqlx::query_as::<_, GrowthExperiment>(&format!(
            r#"
            INSERT INTO growth_experiments (user_id, name, hypothesis, status, metrics)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EXPERIMENT_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(data.name)
        .bind(data.hypothesis)
        .bind(data.status.as_str())
        .bind(data.metrics)
        .fetch_one(pool)
        .await?;

        Ok(experiment)
    }

    /// Finds an experiment by ID (ownership is checked by the caller)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let experiment = sqlx::query_as::<_, GrowthExperiment>(&format!(
            "SELECT {EXPERIMENT_COLUMNS} FROM growth_experiments WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(experiment)
    }

    /// Lists a user's experiments, newest first, optionally by status
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<ExperimentStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let experiments = sqlx::query_as::<_, GrowthExperiment>(&format!(
            r#"
            SELECT {EXPERIMENT_COLUMNS}
            FROM growth_experiments
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await?;

        Ok(experiments)
    }

    /// Patches an experiment; `updated_at` is refreshed
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateGrowthExperiment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let experiment = sqlx::query_as::<_, GrowthExperiment>(&format!(
            r#"
            UPDATE growth_experiments
            SET name = COALESCE($2, name),
                hypothesis = COALESCE($3, hypothesis),
                status = COALESCE($4, status),
                metrics = COALESCE($5, metrics),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EXPERIMENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.hypothesis)
        .bind(data.status.map(|s| s.as_str()))
        .bind(data.metrics)
        .fetch_optional(pool)
        .await?;

        Ok(experiment)
    }

    /// Deletes an experiment (hard delete)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM growth_experiments WHERE id = $1")
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
            ExperimentStatus::Idea,
            ExperimentStatus::Active,
            ExperimentStatus::Paused,
            ExperimentStatus::Completed,
        ] {
            assert_eq!(ExperimentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ExperimentStatus::parse("archived"), None);
    }
}
