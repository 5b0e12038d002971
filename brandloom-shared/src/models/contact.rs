/// Contact (CRM) model and database operations
///
/// Contacts are CRM records with a pipeline status, a lifetime spend
/// total, and free-form tags. Each contact has an append-only activity
/// log ([`ContactActivity`]) recording interactions.
///
/// Contact listing is the one read path with substring search: the `q`
/// filter matches name or email case-insensitively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::ownership::Owned;

/// Contact pipeline status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Lead,
    Prospect,
    Customer,
    Vip,
    Churned,
}

impl ContactStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Lead => "lead",
            ContactStatus::Prospect => "prospect",
            ContactStatus::Customer => "customer",
            ContactStatus::Vip => "vip",
            ContactStatus::Churned => "churned",
        }
    }

    /// Parses status from its database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lead" => Some(ContactStatus::Lead),
            "prospect" => Some(ContactStatus::Prospect),
            "customer" => Some(ContactStatus::Customer),
            "vip" => Some(ContactStatus::Vip),
            "churned" => Some(ContactStatus::Churned),
            _ => None,
        }
    }
}

/// Contact model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    /// Unique contact ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Contact name
    pub name: String,

    /// Contact email (case-insensitive)
    pub email: Option<String>,

    /// Pipeline status
    pub status: String,

    /// Lifetime spend in cents
    pub total_spend_cents: i64,

    /// Free-form tags
    pub tags: Vec<String>,

    /// When the contact was created
    pub created_at: DateTime<Utc>,

    /// When the contact was last updated
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Gets the parsed status, defaulting to Lead
    pub fn get_status(&self) -> ContactStatus {
        ContactStatus::parse(&self.status).unwrap_or(ContactStatus::Lead)
    }
}

impl Owned for Contact {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// A timestamped interaction log entry belonging to one contact
///
/// Activities are append-only: they are created and listed, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactActivity {
    /// Unique activity ID
    pub id: Uuid,

    /// The contact this activity belongs to
    pub contact_id: Uuid,

    /// Owning user (denormalized from the contact for the guard)
    pub user_id: Uuid,

    /// Interaction kind (e.g. "email", "call", "purchase")
    pub kind: String,

    /// Free-form note
    pub note: Option<String>,

    /// When the interaction happened
    pub occurred_at: DateTime<Utc>,

    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
}

impl Owned for ContactActivity {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Input for creating a contact
#[derive(Debug, Clone)]
pub struct CreateContact {
    pub name: String,
    pub email: Option<String>,
    pub status: ContactStatus,
    pub total_spend_cents: i64,
    pub tags: Vec<String>,
}

/// Input for updating a contact; only non-None fields are changed
#[derive(Debug, Clone, Default)]
pub struct UpdateContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<ContactStatus>,
    pub total_spend_cents: Option<i64>,
    pub tags: Option<Vec<String>>,
}

/// Input for appending a contact activity
#[derive(Debug, Clone)]
pub struct CreateContactActivity {
    pub contact_id: Uuid,
    pub kind: String,
    pub note: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

const CONTACT_COLUMNS: &str = "id, user_id, name, email, status, total_spend_cents, tags, \
                               created_at, updated_at";

const ACTIVITY_COLUMNS: &str =
    "id, contact_id, user_id, kind, note, occurred_at, created_at";

impl Contact {
    /// Creates a contact for a user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateContact,
    ) -> Result<Self, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            INSERT INTO contacts (user_id, name, email, status, total_spend_cents, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CONTACT_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.status.as_str())
        .bind(data.total_spend_cents)
        .bind(data.tags)
        .fetch_one(pool)
        .await?;

        Ok(contact)
    }

    /// Finds a contact by ID (ownership is checked by the caller)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// Lists a user's contacts, newest first
    ///
    /// `status` narrows by pipeline status; `search` matches name or email
    /// case-insensitively as a substring.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<ContactStatus>,
        search: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let contacts = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL
                   OR name ILIKE '%' || $3 || '%'
                   OR email ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .bind(search)
        .fetch_all(pool)
        .await?;

        Ok(contacts)
    }

    /// Patches a contact; `updated_at` is refreshed
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateContact,
    ) -> Result<Option<Self>, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            UPDATE contacts
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                status = COALESCE($4, status),
                total_spend_cents = COALESCE($5, total_spend_cents),
                tags = COALESCE($6, tags),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.status.map(|s| s.as_str()))
        .bind(data.total_spend_cents)
        .bind(data.tags)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// Deletes a contact (hard delete; activities cascade)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl ContactActivity {
    /// Appends an activity to a contact's log
    ///
    /// The owning user id is denormalized onto the row so the guard never
    /// needs a join.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateContactActivity,
    ) -> Result<Self, sqlx::Error> {
        let activity = sqlx::query_as::<_, ContactActivity>(&format!(
            r#"
            INSERT INTO contact_activities (contact_id, user_id, kind, note, occurred_at)
            VALUES ($1, $2, $3, $4, COALESCE($5, NOW()))
            RETURNING {ACTIVITY_COLUMNS}
            "#,
        ))
        .bind(data.contact_id)
        .bind(user_id)
        .bind(data.kind)
        .bind(data.note)
        .bind(data.occurred_at)
        .fetch_one(pool)
        .await?;

        Ok(activity)
    }

    /// Lists a contact's activities, most recent first
    pub async fn list_by_contact(
        pool: &PgPool,
        contact_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let activities = sqlx::query_as::<_, ContactActivity>(&format!(
            r#"
            SELECT {ACTIVITY_COLUMNS}
            FROM contact_activities
            WHERE contact_id = $1
            ORDER BY occurred_at DESC
            "#,
        ))
        .bind(contact_id)
        .fetch_all(pool)
        .await?;

        Ok(activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ContactStatus::Lead,
            ContactStatus::Prospect,
            ContactStatus::Customer,
            ContactStatus::Vip,
            ContactStatus::Churned,
        ] {
            assert_eq!(ContactStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ContactStatus::parse("cold"), None);
    }
}
