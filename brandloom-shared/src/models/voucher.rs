/// Voucher model and database operations
///
/// Vouchers are discount codes with a usage cap and counter, an optional
/// expiry, and an active flag. Deleting a voucher is a soft-deactivation
/// (`is_active = FALSE`) — the row is never removed, so past redemptions
/// keep a valid reference.
///
/// Redemptions are append-only. Recording a redemption and incrementing
/// `used_count` happen in one transaction, with the cap re-checked inside
/// it while the voucher row is locked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::ownership::Owned;

/// Why a voucher cannot be redeemed
#[derive(Debug, thiserror::Error)]
pub enum RedeemError {
    /// Voucher has been deactivated
    #[error("Voucher is not active")]
    Inactive,

    /// Voucher expiry has passed
    #[error("Voucher has expired")]
    Expired,

    /// Usage cap reached
    #[error("Voucher usage limit reached")]
    CapReached,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Voucher model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Voucher {
    /// Unique voucher ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Discount code as shown to customers
    pub code: String,

    /// Optional description
    pub description: Option<String>,

    /// Discount in percent (0-100)
    pub discount_percent: i32,

    /// Usage cap
    pub max_uses: i32,

    /// Times redeemed so far
    pub used_count: i32,

    /// Expiry (None = never expires)
    pub expires_at: Option<DateTime<Utc>>,

    /// Active flag; cleared by the soft delete
    pub is_active: bool,

    /// When the voucher was created
    pub created_at: DateTime<Utc>,

    /// When the voucher was last updated
    pub updated_at: DateTime<Utc>,
}

impl Owned for Voucher {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Voucher {
    /// Checks whether the voucher can be redeemed at `now`
    ///
    /// Pure: consulted both by the handler and inside the redemption
    /// transaction while the row is locked.
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> Result<(), RedeemError> {
        if !self.is_active {
            return Err(RedeemError::Inactive);
        }

        if let Some(expires_at) = self.expires_at {
            if now >= expires_at {
                return Err(RedeemError::Expired);
            }
        }

        if self.used_count >= self.max_uses {
            return Err(RedeemError::CapReached);
        }

        Ok(())
    }
}

/// Append-only record of a voucher being applied
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VoucherRedemption {
    /// Unique redemption ID
    pub id: Uuid,

    /// The redeemed voucher
    pub voucher_id: Uuid,

    /// Owning user (same as the voucher's owner)
    pub user_id: Uuid,

    /// Who applied the code (customer email or name)
    pub redeemed_by: String,

    /// When the code was applied
    pub redeemed_at: DateTime<Utc>,
}

/// Input for creating a voucher
#[derive(Debug, Clone)]
pub struct CreateVoucher {
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    pub max_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Input for updating a voucher; only non-None fields are changed
#[derive(Debug, Clone, Default)]
pub struct UpdateVoucher {
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_percent: Option<i32>,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

const VOUCHER_COLUMNS: &str = "id, user_id, code, description, discount_percent, max_uses, \
                               used_count, expires_at, is_active, created_at, updated_at";

const REDEMPTION_COLUMNS: &str = "id, voucher_id, user_id, redeemed_by, redeemed_at";

impl Voucher {
    /// Creates a voucher for a user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateVoucher,
    ) -> Result<Self, sqlx::Error> {
        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            r#"
            INSERT INTO vouchers (user_id, code, description, discount_percent, max_uses, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {VOUCHER_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(data.code)
        .bind(data.description)
        .bind(data.discount_percent)
        .bind(data.max_uses)
        .bind(data.expires_at)
        .fetch_one(pool)
        .await?;

        Ok(voucher)
    }

    /// Finds a voucher by ID (ownership is checked by the caller)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(voucher)
    }

    /// Lists a user's vouchers, newest first
    ///
    /// Deactivated vouchers are included; they remain fetchable forever.
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let vouchers = sqlx::query_as::<_, Voucher>(&format!(
            r#"
            SELECT {VOUCHER_COLUMNS}
            FROM vouchers
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(vouchers)
    }

    /// Patches a voucher; `updated_at` is refreshed
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateVoucher,
    ) -> Result<Option<Self>, sqlx::Error> {
        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            r#"
            UPDATE vouchers
            SET code = COALESCE($2, code),
                description = COALESCE($3, description),
                discount_percent = COALESCE($4, discount_percent),
                max_uses = COALESCE($5, max_uses),
                expires_at = COALESCE($6, expires_at),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {VOUCHER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.code)
        .bind(data.description)
        .bind(data.discount_percent)
        .bind(data.max_uses)
        .bind(data.expires_at)
        .bind(data.is_active)
        .fetch_optional(pool)
        .await?;

        Ok(voucher)
    }

    /// Soft-deactivates a voucher
    ///
    /// This is the DELETE semantics for vouchers: the row survives with
    /// `is_active = FALSE`.
    pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE vouchers SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Redeems a voucher: inserts a redemption and bumps `used_count`
    ///
    /// Runs in one transaction. The voucher row is locked and the cap,
    /// expiry, and active flag re-checked inside the transaction, so two
    /// concurrent redemptions of a one-use voucher cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns a `RedeemError` naming the reason when the voucher is
    /// inactive, expired, or at its cap; `Database` for anything else.
    pub async fn redeem(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        redeemed_by: String,
    ) -> Result<VoucherRedemption, RedeemError> {
        let mut tx = pool.begin().await?;

        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE id = $1 FOR UPDATE",
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        voucher.check_redeemable(Utc::now())?;

        let redemption = sqlx::query_as::<_, VoucherRedemption>(&format!(
            r#"
            INSERT INTO voucher_redemptions (voucher_id, user_id, redeemed_by)
            VALUES ($1, $2, $3)
            RETURNING {REDEMPTION_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(user_id)
        .bind(redeemed_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE vouchers SET used_count = used_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(redemption)
    }
}

impl VoucherRedemption {
    /// Lists redemptions of a voucher, most recent first
    pub async fn list_by_voucher(
        pool: &PgPool,
        voucher_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let redemptions = sqlx::query_as::<_, VoucherRedemption>(&format!(
            r#"
            SELECT {REDEMPTION_COLUMNS}
            FROM voucher_redemptions
            WHERE voucher_id = $1
            ORDER BY redeemed_at DESC
            "#,
        ))
        .bind(voucher_id)
        .fetch_all(pool)
        .await?;

        Ok(redemptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_voucher() -> Voucher {
        Voucher {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            code: "SPRING20".to_string(),
            description: None,
            discount_percent: 20,
            max_uses: 2,
            used_count: 0,
            expires_at: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_redeemable_when_fresh() {
        let voucher = sample_voucher();
        assert!(voucher.check_redeemable(Utc::now()).is_ok());
    }

    #[test]
    fn test_inactive_voucher_is_not_redeemable() {
        let mut voucher = sample_voucher();
        voucher.is_active = false;

        assert!(matches!(
            voucher.check_redeemable(Utc::now()),
            Err(RedeemError::Inactive)
        ));
    }

    #[test]
    fn test_expired_voucher_is_not_redeemable() {
        let mut voucher = sample_voucher();
        voucher.expires_at = Some(Utc::now() - Duration::hours(1));

        assert!(matches!(
            voucher.check_redeemable(Utc::now()),
            Err(RedeemError::Expired)
        ));
    }

    #[test]
    fn test_future_expiry_is_redeemable() {
        let mut voucher = sample_voucher();
        voucher.expires_at = Some(Utc::now() + Duration::hours(1));

        assert!(voucher.check_redeemable(Utc::now()).is_ok());
    }

    #[test]
    fn test_cap_reached_is_not_redeemable() {
        let mut voucher = sample_voucher();
        voucher.used_count = 2;

        assert!(matches!(
            voucher.check_redeemable(Utc::now()),
            Err(RedeemError::CapReached)
        ));
    }

    #[test]
    fn test_inactive_wins_over_cap() {
        // Deactivation is reported before the cap so a deactivated voucher
        // never reads as "limit reached"
        let mut voucher = sample_voucher();
        voucher.is_active = false;
        voucher.used_count = 5;

        assert!(matches!(
            voucher.check_redeemable(Utc::now()),
            Err(RedeemError::Inactive)
        ));
    }
}
