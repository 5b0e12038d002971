/// API route handlers
///
/// One module per resource family:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, refresh, OAuth, tier selection
/// - `brand`: Brand profile (upsert)
/// - `channels`, `posts`, `campaigns`, `contacts`, `vouchers`,
///   `calendar`, `growth`: owned-resource CRUD
/// - `settings`: AI settings (upsert)
/// - `admin`: Admin console (user listing, tier/role changes)
/// - `ai`: AI content assist
/// - `billing`: Checkout session + payments webhook
///
/// Handlers share one shape: resolve the auth context, gate the feature
/// area where one applies, run the model call, wrap the result in a
/// resource-keyed JSON object.

pub mod admin;
pub mod ai;
pub mod auth;
pub mod billing;
pub mod brand;
pub mod calendar;
pub mod campaigns;
pub mod channels;
pub mod contacts;
pub mod growth;
pub mod health;
pub mod posts;
pub mod settings;
pub mod vouchers;

use crate::error::ApiError;
use brandloom_shared::access::Feature;
use brandloom_shared::auth::middleware::AuthContext;

/// Gates a feature-mapped route family by the caller's tier
///
/// Returns 403 when the tier's access table excludes the feature.
pub(crate) fn require_feature(auth: &AuthContext, feature: Feature) -> Result<(), ApiError> {
    if auth.can_access(feature) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Unwraps a required request field, producing the field-named 400
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("{} is required", field)))
}

/// Unwraps a required string field; empty counts as missing
pub(crate) fn required_str(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ApiError::BadRequest(format!("{} is required", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandloom_shared::access::{Role, Tier};
    use brandloom_shared::auth::jwt::{Claims, TokenType};
    use uuid::Uuid;

    fn auth(tier: Tier) -> AuthContext {
        AuthContext::from_claims(&Claims::new(Uuid::new_v4(), tier, Role::User, TokenType::Access))
    }

    #[test]
    fn test_require_feature() {
        assert!(require_feature(&auth(Tier::Gold), Feature::Campaigns).is_ok());
        assert!(matches!(
            require_feature(&auth(Tier::Basic), Feature::Campaigns),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn test_required_names_the_field() {
        let err = required::<i32>(None, "discount_percent").unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "discount_percent is required"),
            other => panic!("expected BadRequest, got {:?}", other),
        }

        assert_eq!(required(Some(5), "discount_percent").unwrap(), 5);
    }

    #[test]
    fn test_required_str_rejects_empty() {
        assert!(required_str(Some("  ".to_string()), "name").is_err());
        assert!(required_str(None, "name").is_err());
        assert_eq!(required_str(Some("ok".to_string()), "name").unwrap(), "ok");
    }
}
