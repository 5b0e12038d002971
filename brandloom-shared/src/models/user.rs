/// User model and database operations
///
/// Users are the owners of every other entity in the system. Accounts are
/// created by the registration endpoint (with an Argon2id password hash)
/// or auto-provisioned by the OAuth path (no hash). Users are never
/// hard-deleted in any observed flow.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     name VARCHAR(255),
///     password_hash VARCHAR(255),
///     tier VARCHAR(50) NOT NULL DEFAULT 'basic',
///     role VARCHAR(50) NOT NULL DEFAULT 'user',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use brandloom_shared::access::Tier;
/// use brandloom_shared::models::user::{CreateUser, User};
/// use brandloom_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: Some("$argon2id$...".to_string()),
///     name: Some("Ada".to_string()),
///     tier: Tier::Basic,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::{Role, Tier};

/// User model representing an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT), unique across all users
    pub email: String,

    /// Optional display name
    pub name: Option<String>,

    /// Argon2id password hash; None for OAuth-provisioned accounts
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// Subscription tier ("basic", "gold", "enterprise")
    pub tier: String,

    /// Role ("user", "admin")
    pub role: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Gets the parsed tier, defaulting to Basic for anything unexpected
    ///
    /// The CHECK constraint keeps the column within the known set; the
    /// default only matters for rows predating a tier rename.
    pub fn get_tier(&self) -> Tier {
        Tier::parse(&self.tier).unwrap_or(Tier::Basic)
    }

    /// Gets the parsed role, defaulting to User
    pub fn get_role(&self) -> Role {
        Role::parse(&self.role).unwrap_or(Role::User)
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address (stored case-insensitively)
    pub email: String,

    /// Argon2id hash; None for OAuth accounts
    pub password_hash: Option<String>,

    /// Optional display name
    pub name: Option<String>,

    /// Initial tier
    pub tier: Tier,
}

/// Input for updating an existing user (admin console)
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New display name
    pub name: Option<String>,

    /// New tier
    pub tier: Option<Tier>,

    /// New role
    pub role: Option<Role>,
}

const USER_COLUMNS: &str = "id, email, name, password_hash, tier, role, \
                            created_at, updated_at, last_login_at";

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, tier)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.tier.as_str())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (case-insensitive via CITEXT)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1",
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates a user's mutable fields
    ///
    /// Only non-None fields are changed; `updated_at` is refreshed.
    /// Returns the updated user, or None if the user does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                tier = COALESCE($3, tier),
                role = COALESCE($4, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.tier.map(|t| t.as_str()))
        .bind(data.role.map(|r| r.as_str()))
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Sets a user's subscription tier
    ///
    /// Used by tier selection and by the payment webhook.
    pub async fn update_tier(pool: &PgPool, id: Uuid, tier: Tier) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET tier = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(tier.as_str())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates the last login timestamp, called after authentication
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all users with pagination, newest first (admin console)
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts total number of users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(tier: &str, role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            name: Some("Test".to_string()),
            password_hash: Some("hash".to_string()),
            tier: tier.to_string(),
            role: role.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_get_tier_and_role() {
        let user = sample_user("gold", "admin");
        assert_eq!(user.get_tier(), Tier::Gold);
        assert_eq!(user.get_role(), Role::Admin);
    }

    #[test]
    fn test_unknown_tier_defaults_to_basic() {
        let user = sample_user("legacy-plan", "user");
        assert_eq!(user.get_tier(), Tier::Basic);
        assert_eq!(user.get_role(), Role::User);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = sample_user("basic", "user");
        let json = serde_json::to_string(&user).unwrap();

        assert!(!json.contains("password_hash"));
        assert!(!json.contains("hash"));
    }
}
