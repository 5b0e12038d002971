/// Channel model and database operations
///
/// A channel is a connected social or email platform account (platform
/// name, handle, active flag, follower count). A user can connect many
/// channels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::ownership::Owned;

/// Channel model representing a connected platform account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Channel {
    /// Unique channel ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Platform name (e.g. "instagram", "linkedin", "newsletter")
    pub platform: String,

    /// Account handle on the platform
    pub handle: String,

    /// Whether the connection is active
    pub active: bool,

    /// Follower count as last synced
    pub followers: i32,

    /// When the channel was connected
    pub created_at: DateTime<Utc>,

    /// When the channel was last updated
    pub updated_at: DateTime<Utc>,
}

impl Owned for Channel {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Input for connecting a new channel
#[derive(Debug, Clone)]
pub struct CreateChannel {
    /// Platform name
    pub platform: String,

    /// Account handle
    pub handle: String,

    /// Whether the connection starts active
    pub active: bool,

    /// Initial follower count
    pub followers: i32,
}

/// Input for updating a channel; only non-None fields are changed
#[derive(Debug, Clone, Default)]
pub struct UpdateChannel {
    pub platform: Option<String>,
    pub handle: Option<String>,
    pub active: Option<bool>,
    pub followers: Option<i32>,
}

const CHANNEL_COLUMNS: &str =
    "id, user_id, platform, handle, active, followers, created_at, updated_at";

impl Channel {
    /// Connects a new channel for a user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateChannel,
    ) -> Result<Self, sqlx::Error> {
        let channel = sqlx::query_as::<_, Channel>(&format!(
            r#"
            INSERT INTO channels (user_id, platform, handle, active, followers)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CHANNEL_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(data.platform)
        .bind(data.handle)
        .bind(data.active)
        .bind(data.followers)
        .fetch_one(pool)
        .await?;

        Ok(channel)
    }

    /// Finds a channel by ID (ownership is checked by the caller)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let channel = sqlx::query_as::<_, Channel>(&format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(channel)
    }

    /// Lists a user's channels, newest first
    ///
    /// `platform` narrows to a single platform when present.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        platform: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let channels = sqlx::query_as::<_, Channel>(&format!(
            r#"
            SELECT {CHANNEL_COLUMNS}
            FROM channels
            WHERE user_id = $1
              AND ($2::text IS NULL OR platform = $2)
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .bind(platform)
        .fetch_all(pool)
        .await?;

        Ok(channels)
    }

    /// Patches a channel; `updated_at` is refreshed
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateChannel,
    ) -> Result<Option<Self>, sqlx::Error> {
        let channel = sqlx::query_as::<_, Channel>(&format!(
            r#"
            UPDATE channels
            SET platform = COALESCE($2, platform),
                handle = COALESCE($3, handle),
                active = COALESCE($4, active),
                followers = COALESCE($5, followers),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CHANNEL_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.platform)
        .bind(data.handle)
        .bind(data.active)
        .bind(data.followers)
        .fetch_optional(pool)
        .await?;

        Ok(channel)
    }

    /// Deletes a channel (hard delete; posts keep living via SET NULL)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM channels WHERE id = $1")
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
    fn test_update_channel_default_is_empty_patch() {
        let update = UpdateChannel::default();
        assert!(update.platform.is_none());
        assert!(update.handle.is_none());
        assert!(update.active.is_none());
        assert!(update.followers.is_none());
    }
}
