/// Payments endpoints (Stripe-shaped, thin)
///
/// Two narrow integrations:
///
/// - `POST /api/stripe/checkout` - One form POST creating a checkout
///   session for the requested tier; the response is just the redirect URL
/// - `POST /api/stripe/webhook` - Public, but the provider signature
///   header is verified before the payload is trusted. A completed
///   checkout updates the referenced user's tier; every other event type
///   is acknowledged and ignored
///
/// # Webhook signatures
///
/// The signature header has the form `t=<ts>,v1=<hex>`, where `<hex>` is
/// HMAC-SHA256 of `"<ts>.<payload>"` under the webhook secret. Comparison
/// is constant-time via `Mac::verify_slice`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::required_str,
};
use axum::{extract::State, http::HeaderMap, Extension, Json};
use brandloom_shared::{
    access::Tier,
    auth::middleware::AuthContext,
    models::user::User,
};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{info, warn};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Checkout request
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// The tier to purchase ("gold" or "enterprise")
    pub tier: Option<String>,
}

/// Checkout response
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Where to redirect the browser
    pub url: String,
}

/// Webhook acknowledgement
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub received: bool,
}

/// Signature verification failure
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// Header is missing a `t=` or `v1=` component
    #[error("Signature header is malformed")]
    Malformed,

    /// The `v1` value is not valid hex
    #[error("Signature is not valid hex")]
    InvalidEncoding,

    /// No candidate signature matched
    #[error("Signature mismatch")]
    Mismatch,
}

/// Verifies a webhook signature header against the raw payload
///
/// Accepts any matching `v1` candidate (the provider sends several during
/// secret rotation). Comparison is constant-time.
pub fn verify_webhook_signature(
    secret: &str,
    payload: &str,
    header: &str,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<&str> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if candidates.is_empty() {
        return Err(SignatureError::Malformed);
    }

    let signed_payload = format!("{}.{}", timestamp, payload);

    for candidate in candidates {
        let bytes = hex::decode(candidate).map_err(|_| SignatureError::InvalidEncoding)?;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| SignatureError::Malformed)?;
        mac.update(signed_payload.as_bytes());

        if mac.verify_slice(&bytes).is_ok() {
            return Ok(());
        }
    }

    Err(SignatureError::Mismatch)
}

/// Create a checkout session for a tier upgrade
///
/// Provider failure surfaces as the generic 500; nothing is retried.
pub async fn create_checkout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    let tier_str = required_str(req.tier, "tier")?;
    let tier =
        Tier::parse(&tier_str).ok_or_else(|| ApiError::BadRequest("tier is invalid".to_string()))?;

    let stripe = state
        .config
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::InternalError("Payments are not configured".to_string()))?;

    let price = match tier {
        Tier::Gold => &stripe.price_gold,
        Tier::Enterprise => &stripe.price_enterprise,
        Tier::Basic => {
            return Err(ApiError::BadRequest(
                "tier is invalid".to_string(),
            ))
        }
    };

    let client = reqwest::Client::new();
    let user_id = auth.user_id.to_string();

    let response = client
        .post("https://api.stripe.com/v1/checkout/sessions")
        .basic_auth(&stripe.secret_key, None::<&str>)
        .form(&[
            ("mode", "subscription"),
            ("line_items[0][price]", price.as_str()),
            ("line_items[0][quantity]", "1"),
            ("success_url", stripe.success_url.as_str()),
            ("cancel_url", stripe.cancel_url.as_str()),
            ("client_reference_id", user_id.as_str()),
            ("metadata[tier]", tier.as_str()),
        ])
        .send()
        .await
        .map_err(|e| ApiError::InternalError(format!("Checkout session failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::InternalError(format!(
            "Checkout session failed: provider returned {}",
            status
        )));
    }

    let payload: serde_json::Value = response
        .json()
        .await
        .map_err(|e| ApiError::InternalError(format!("Checkout response unreadable: {}", e)))?;

    let url = payload["url"]
        .as_str()
        .ok_or_else(|| ApiError::InternalError("Checkout response missing url".to_string()))?
        .to_string();

    Ok(Json(CheckoutResponse { url }))
}

/// Payments webhook
///
/// The signature header is validated before anything in the payload is
/// trusted. On `checkout.session.completed` the referenced user's tier is
/// updated; tokens minted before the change pick it up at refresh.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Json<WebhookResponse>> {
    let stripe = state
        .config
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::InternalError("Payments are not configured".to_string()))?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("signature is missing".to_string()))?;

    verify_webhook_signature(&stripe.webhook_secret, &body, signature)
        .map_err(|_| ApiError::BadRequest("signature is invalid".to_string()))?;

    let event: serde_json::Value = serde_json::from_str(&body)
        .map_err(|_| ApiError::BadRequest("payload is invalid".to_string()))?;

    let event_type = event["type"].as_str().unwrap_or_default();

    if event_type == "checkout.session.completed" {
        let session = &event["data"]["object"];

        let user_id = session["client_reference_id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok());
        let tier = session["metadata"]["tier"]
            .as_str()
            .and_then(Tier::parse);

        match (user_id, tier) {
            (Some(user_id), Some(tier)) => {
                let updated = User::update_tier(&state.db, user_id, tier).await?;
                if updated {
                    info!(user_id = %user_id, tier = tier.as_str(), "Tier updated by checkout");
                } else {
                    warn!(user_id = %user_id, "Checkout referenced an unknown user");
                }
            }
            _ => {
                warn!("Completed checkout without usable reference; ignoring");
            }
        }
    }

    Ok(Json(WebhookResponse { received: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    /// Builds a valid signature header for a payload
    fn sign(payload: &str, timestamp: &str) -> String {
        let signed_payload = format!("{}.{}", timestamp, payload);
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        let sig = hex::encode(mac.finalize().into_bytes());
        format!("t={},v1={}", timestamp, sig)
    }

    #[test]
    fn test_valid_signature_passes() {
        let payload = r#"{"type":"checkout.session.completed"}"#;
        let header = sign(payload, "1700000000");

        assert!(verify_webhook_signature(SECRET, payload, &header).is_ok());
    }

    #[test]
    fn test_tampered_payload_fails() {
        let header = sign(r#"{"type":"checkout.session.completed"}"#, "1700000000");

        let result = verify_webhook_signature(SECRET, r#"{"type":"evil"}"#, &header);
        assert!(matches!(result, Err(SignatureError::Mismatch)));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let payload = "{}";
        let header = sign(payload, "1700000000");

        let result = verify_webhook_signature("whsec_other", payload, &header);
        assert!(matches!(result, Err(SignatureError::Mismatch)));
    }

    #[test]
    fn test_malformed_header_fails() {
        assert!(matches!(
            verify_webhook_signature(SECRET, "{}", "no-components-here"),
            Err(SignatureError::Malformed)
        ));
        assert!(matches!(
            verify_webhook_signature(SECRET, "{}", "t=123"),
            Err(SignatureError::Malformed)
        ));
        assert!(matches!(
            verify_webhook_signature(SECRET, "{}", "v1=abcd"),
            Err(SignatureError::Malformed)
        ));
    }

    #[test]
    fn test_non_hex_signature_fails() {
        let result = verify_webhook_signature(SECRET, "{}", "t=123,v1=not-hex!");
        assert!(matches!(result, Err(SignatureError::InvalidEncoding)));
    }

    #[test]
    fn test_rotation_accepts_any_matching_candidate() {
        let payload = "{}";
        let timestamp = "1700000000";

        let signed_payload = format!("{}.{}", timestamp, payload);
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        let good = hex::encode(mac.finalize().into_bytes());

        let header = format!("t={},v1={},v1={}", timestamp, "00".repeat(32), good);
        assert!(verify_webhook_signature(SECRET, payload, &header).is_ok());
    }
}
