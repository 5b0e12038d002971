/// Post model and database operations
///
/// A post is a content item with a lifecycle status, optional links to a
/// channel and a campaign, and per-post engagement counters.
///
/// # Lifecycle
///
/// ```text
/// draft ──> scheduled ──> published
///                └───────> failed
/// ```
///
/// Status transitions are driven by the client; the server stores whatever
/// valid status it is given. A post created without a status starts as a
/// draft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::ownership::Owned;

/// Post lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Being written
    Draft,

    /// Queued for a future publish time
    Scheduled,

    /// Live on the channel
    Published,

    /// Publish attempt failed
    Failed,
}

impl PostStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
            PostStatus::Failed => "failed",
        }
    }

    /// Parses status from its database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PostStatus::Draft),
            "scheduled" => Some(PostStatus::Scheduled),
            "published" => Some(PostStatus::Published),
            "failed" => Some(PostStatus::Failed),
            _ => None,
        }
    }
}

/// Post model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Target channel (None when unassigned or the channel was removed)
    pub channel_id: Option<Uuid>,

    /// Parent campaign (None when standalone)
    pub campaign_id: Option<Uuid>,

    /// Optional title
    pub title: Option<String>,

    /// Post body
    pub content: String,

    /// Lifecycle status
    pub status: String,

    /// When the post is scheduled to publish
    pub scheduled_at: Option<DateTime<Utc>>,

    /// When the post actually published
    pub published_at: Option<DateTime<Utc>>,

    /// Engagement counters
    pub likes: i32,
    pub comments: i32,
    pub shares: i32,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// When the post was last updated
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Gets the parsed status, defaulting to Draft
    pub fn get_status(&self) -> PostStatus {
        PostStatus::parse(&self.status).unwrap_or(PostStatus::Draft)
    }
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub channel_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: String,

    /// Lifecycle status; defaults to draft when the request omits it
    pub status: PostStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Input for updating a post; only non-None fields are changed
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub channel_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<PostStatus>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub likes: Option<i32>,
    pub comments: Option<i32>,
    pub shares: Option<i32>,
}

/// Filters for listing posts
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Narrow to a lifecycle status
    pub status: Option<PostStatus>,

    /// Narrow to a channel
    pub channel_id: Option<Uuid>,

    /// Narrow to a campaign
    pub campaign_id: Option<Uuid>,
}

const POST_COLUMNS: &str = "id, user_id, channel_id, campaign_id, title, content, status, \
                            scheduled_at, published_at, likes, comments, shares, \
                            created_at, updated_at";

impl Post {
    /// Creates a post for a user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreatePost,
    ) -> Result<Self, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts
                (user_id, channel_id, campaign_id, title, content, status, scheduled_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(data.channel_id)
        .bind(data.campaign_id)
        .bind(data.title)
        .bind(data.content)
        .bind(data.status.as_str())
        .bind(data.scheduled_at)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Finds a post by ID (ownership is checked by the caller)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Lists a user's posts with optional equality filters, newest first
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        filter: PostFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR channel_id = $3)
              AND ($4::uuid IS NULL OR campaign_id = $4)
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.channel_id)
        .bind(filter.campaign_id)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Lists a user's most recent posts (prompt context for AI assist)
    pub async fn list_recent(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Patches a post; `updated_at` is refreshed
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePost,
    ) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET channel_id = COALESCE($2, channel_id),
                campaign_id = COALESCE($3, campaign_id),
                title = COALESCE($4, title),
                content = COALESCE($5, content),
                status = COALESCE($6, status),
                scheduled_at = COALESCE($7, scheduled_at),
                published_at = COALESCE($8, published_at),
                likes = COALESCE($9, likes),
                comments = COALESCE($10, comments),
                shares = COALESCE($11, shares),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.channel_id)
        .bind(data.campaign_id)
        .bind(data.title)
        .bind(data.content)
        .bind(data.status.map(|s| s.as_str()))
        .bind(data.scheduled_at)
        .bind(data.published_at)
        .bind(data.likes)
        .bind(data.comments)
        .bind(data.shares)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Deletes a post (hard delete)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
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
            PostStatus::Draft,
            PostStatus::Scheduled,
            PostStatus::Published,
            PostStatus::Failed,
        ] {
            assert_eq!(PostStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PostStatus::parse("archived"), None);
    }

    #[test]
    fn test_get_status_defaults_to_draft() {
        let post = Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            channel_id: None,
            campaign_id: None,
            title: None,
            content: "hello".to_string(),
            status: "bogus".to_string(),
            scheduled_at: None,
            published_at: None,
            likes: 0,
            comments: 0,
            shares: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(post.get_status(), PostStatus::Draft);
    }
}
