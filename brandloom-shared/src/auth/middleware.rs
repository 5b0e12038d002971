/// Authenticated request context
///
/// After the API server's auth layer validates a session token, it inserts
/// an [`AuthContext`] into the request extensions. Handlers extract it with
/// Axum's `Extension` extractor and consult it for identity, tier gating,
/// and the admin check.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use brandloom_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{Feature, Role, Tier};
use crate::auth::jwt::Claims;

/// Authentication context added to request extensions
///
/// Carries the identity claims of the validated access token. Tier and
/// role reflect the token, not the live database row; the refresh endpoint
/// is the point where they are re-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Subscription tier at token mint time
    pub tier: Tier,

    /// Role at token mint time
    pub role: Role,
}

impl AuthContext {
    /// Creates auth context from validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            tier: claims.tier,
            role: claims.role,
        }
    }

    /// Checks whether the caller's tier may reach a feature area
    pub fn can_access(&self, feature: Feature) -> bool {
        self.tier.accessible(feature)
    }

    /// Checks whether the caller may use the admin console
    ///
    /// Admins on any tier qualify, as do enterprise accounts.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.tier == Tier::Enterprise
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;

    #[test]
    fn test_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Tier::Gold, Role::User, TokenType::Access);
        let auth = AuthContext::from_claims(&claims);

        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.tier, Tier::Gold);
        assert_eq!(auth.role, Role::User);
    }

    #[test]
    fn test_can_access_follows_tier() {
        let claims = Claims::new(Uuid::new_v4(), Tier::Basic, Role::User, TokenType::Access);
        let auth = AuthContext::from_claims(&claims);

        assert!(auth.can_access(Feature::Dashboard));
        assert!(!auth.can_access(Feature::Campaigns));
    }

    #[test]
    fn test_is_admin() {
        let admin_role =
            AuthContext::from_claims(&Claims::new(Uuid::new_v4(), Tier::Basic, Role::Admin, TokenType::Access));
        assert!(admin_role.is_admin());

        let enterprise_tier =
            AuthContext::from_claims(&Claims::new(Uuid::new_v4(), Tier::Enterprise, Role::User, TokenType::Access));
        assert!(enterprise_tier.is_admin());

        let regular =
            AuthContext::from_claims(&Claims::new(Uuid::new_v4(), Tier::Gold, Role::User, TokenType::Access));
        assert!(!regular.is_admin());
    }
}
