/// Voucher endpoints
///
/// Vouchers are never hard-deleted: DELETE is a soft-deactivation and the
/// row stays fetchable with `is_active = false`.
///
/// # Endpoints
///
/// - `GET /api/vouchers` - List the caller's vouchers
/// - `POST /api/vouchers` - Create a voucher
/// - `PUT /api/vouchers` - Update a voucher (`id` in body)
/// - `DELETE /api/vouchers` - Soft-deactivate (`id` in body)
/// - `POST /api/vouchers/send` - Email the code to a recipient
/// - `POST /api/vouchers/redeem` - Record a redemption (transactional)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{required, required_str},
};
use axum::{extract::State, Extension, Json};
use brandloom_shared::{
    auth::{middleware::AuthContext, ownership::assert_owned},
    models::voucher::{CreateVoucher, UpdateVoucher, Voucher, VoucherRedemption},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create voucher request
#[derive(Debug, Deserialize)]
pub struct CreateVoucherRequest {
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_percent: Option<i32>,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Update voucher request; `id` names the target row
#[derive(Debug, Deserialize)]
pub struct UpdateVoucherRequest {
    pub id: Option<Uuid>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_percent: Option<i32>,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

/// Delete request; the id travels in the body
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: Option<Uuid>,
}

/// Send-by-email request
#[derive(Debug, Deserialize)]
pub struct SendVoucherRequest {
    pub id: Option<Uuid>,

    /// Recipient email address
    pub email: Option<String>,
}

/// Redeem request
#[derive(Debug, Deserialize)]
pub struct RedeemVoucherRequest {
    pub id: Option<Uuid>,

    /// Who applied the code (customer email or name)
    pub redeemed_by: Option<String>,
}

/// Voucher list response wrapper
#[derive(Debug, Serialize)]
pub struct VouchersResponse {
    pub vouchers: Vec<Voucher>,
}

/// Single voucher response wrapper
#[derive(Debug, Serialize)]
pub struct VoucherResponse {
    pub voucher: Voucher,
}

/// Redemption response wrapper
#[derive(Debug, Serialize)]
pub struct RedemptionResponse {
    pub redemption: VoucherRedemption,
}

/// Delete/send response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// List the caller's vouchers (deactivated ones included)
pub async fn list_vouchers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<VouchersResponse>> {
    let vouchers = Voucher::list_by_user(&state.db, auth.user_id).await?;

    Ok(Json(VouchersResponse { vouchers }))
}

/// Create a voucher
pub async fn create_voucher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateVoucherRequest>,
) -> ApiResult<Json<VoucherResponse>> {
    let code = required_str(req.code, "code")?;
    let discount_percent = required(req.discount_percent, "discount_percent")?;

    if !(0..=100).contains(&discount_percent) {
        return Err(ApiError::BadRequest(
            "discount_percent must be between 0 and 100".to_string(),
        ));
    }

    let voucher = Voucher::create(
        &state.db,
        auth.user_id,
        CreateVoucher {
            code,
            description: req.description,
            discount_percent,
            max_uses: req.max_uses.unwrap_or(1),
            expires_at: req.expires_at,
        },
    )
    .await?;

    Ok(Json(VoucherResponse { voucher }))
}

/// Update a voucher (ownership-guarded)
pub async fn update_voucher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateVoucherRequest>,
) -> ApiResult<Json<VoucherResponse>> {
    let id = required(req.id, "id")?;

    let existing = Voucher::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    let voucher = Voucher::update(
        &state.db,
        id,
        UpdateVoucher {
            code: req.code,
            description: req.description,
            discount_percent: req.discount_percent,
            max_uses: req.max_uses,
            expires_at: req.expires_at,
            is_active: req.is_active,
        },
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(VoucherResponse { voucher }))
}

/// Soft-deactivate a voucher (ownership-guarded)
///
/// The row is never removed; it stays fetchable with `is_active = false`.
pub async fn delete_voucher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<DeleteRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let id = required(req.id, "id")?;

    let existing = Voucher::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    Voucher::deactivate(&state.db, id).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Email a voucher code to a recipient (ownership-guarded)
///
/// SMTP failures and a missing mailer both surface as the generic 500.
pub async fn send_voucher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<SendVoucherRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let id = required(req.id, "id")?;
    let email = required_str(req.email, "email")?;

    let existing = Voucher::find_by_id(&state.db, id).await?;
    let voucher = assert_owned(existing, auth.user_id)?;

    let mailer = state
        .mailer
        .as_ref()
        .ok_or_else(|| ApiError::InternalError("SMTP is not configured".to_string()))?;

    let subject = format!("Your {}% discount code", voucher.discount_percent);
    let mut body = format!(
        "Here is your discount code: {}\n\nIt takes {}% off your order.",
        voucher.code, voucher.discount_percent
    );
    if let Some(expires_at) = voucher.expires_at {
        body.push_str(&format!(
            "\nThe code is valid until {}.",
            expires_at.format("%Y-%m-%d")
        ));
    }

    mailer.send(&email, &subject, body).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Record a voucher redemption (ownership-guarded)
///
/// The redemption row and the `used_count` increment commit together; an
/// inactive, expired, or capped voucher is a 400 naming the reason and
/// nothing is written.
pub async fn redeem_voucher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<RedeemVoucherRequest>,
) -> ApiResult<Json<RedemptionResponse>> {
    let id = required(req.id, "id")?;
    let redeemed_by = required_str(req.redeemed_by, "redeemed_by")?;

    let existing = Voucher::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    let redemption = Voucher::redeem(&state.db, id, auth.user_id, redeemed_by).await?;

    Ok(Json(RedemptionResponse { redemption }))
}
