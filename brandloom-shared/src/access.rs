/// Subscription tiers, user roles, and the feature access policy
///
/// Every user carries a [`Tier`] and a [`Role`]. The tier gates which
/// feature areas of the product a user may reach; the policy is a static
/// table consulted both by the dashboard navigation and by the API's
/// feature-gated route families.
///
/// # Access Table
///
/// - **basic**: dashboard
/// - **gold**: dashboard, brand, media, calendar, channels, publishing,
///   analytics, campaigns, growth, dates, settings
/// - **enterprise**: everything gold has, plus agent and admin
///
/// # Example
///
/// ```
/// use brandloom_shared::access::{Feature, Tier};
///
/// assert!(Tier::Gold.accessible(Feature::Campaigns));
/// assert!(!Tier::Basic.accessible(Feature::Campaigns));
/// assert!(Tier::Enterprise.accessible(Feature::Admin));
/// ```

use serde::{Deserialize, Serialize};

/// Subscription tier
///
/// Tiers determine which feature areas a user may reach. They are mutated
/// by plan selection or by payment webhook events, never by feature routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Free tier, dashboard only
    Basic,

    /// Paid tier with the full marketing toolset
    Gold,

    /// Everything, including the AI agent and admin console
    Enterprise,
}

impl Tier {
    /// Converts tier to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Gold => "gold",
            Tier::Enterprise => "enterprise",
        }
    }

    /// Parses tier from its database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(Tier::Basic),
            "gold" => Some(Tier::Gold),
            "enterprise" => Some(Tier::Enterprise),
            _ => None,
        }
    }

    /// Checks whether this tier may reach a feature area
    ///
    /// This is a pure function over a static table; it never touches the
    /// database.
    pub fn accessible(&self, feature: Feature) -> bool {
        match self {
            Tier::Basic => matches!(feature, Feature::Dashboard),
            Tier::Gold => !matches!(feature, Feature::Agent | Feature::Admin),
            Tier::Enterprise => true,
        }
    }
}

/// User role
///
/// Roles are orthogonal to tiers: an admin on any tier may reach the
/// admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account
    User,

    /// Operator account with access to the admin console
    Admin,
}

impl Role {
    /// Converts role to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parses role from its database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Feature areas of the product
///
/// One key per navigable area of the dashboard. Contacts and vouchers are
/// not in this table; their routes are gated by authentication only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Dashboard,
    Brand,
    Media,
    Calendar,
    Channels,
    Publishing,
    Analytics,
    Campaigns,
    Growth,
    Dates,
    Settings,
    Agent,
    Admin,
}

impl Feature {
    /// All feature areas, in navigation order
    pub const ALL: [Feature; 13] = [
        Feature::Dashboard,
        Feature::Brand,
        Feature::Media,
        Feature::Calendar,
        Feature::Channels,
        Feature::Publishing,
        Feature::Analytics,
        Feature::Campaigns,
        Feature::Growth,
        Feature::Dates,
        Feature::Settings,
        Feature::Agent,
        Feature::Admin,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_roundtrip() {
        for tier in [Tier::Basic, Tier::Gold, Tier::Enterprise] {
            assert_eq!(Tier::parse(tier.as_str()), Some(tier));
        }
        assert_eq!(Tier::parse("platinum"), None);
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::User, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_basic_reaches_only_dashboard() {
        for feature in Feature::ALL {
            let expected = feature == Feature::Dashboard;
            assert_eq!(Tier::Basic.accessible(feature), expected);
        }
    }

    #[test]
    fn test_gold_excludes_agent_and_admin() {
        assert!(Tier::Gold.accessible(Feature::Dashboard));
        assert!(Tier::Gold.accessible(Feature::Brand));
        assert!(Tier::Gold.accessible(Feature::Media));
        assert!(Tier::Gold.accessible(Feature::Calendar));
        assert!(Tier::Gold.accessible(Feature::Channels));
        assert!(Tier::Gold.accessible(Feature::Publishing));
        assert!(Tier::Gold.accessible(Feature::Analytics));
        assert!(Tier::Gold.accessible(Feature::Campaigns));
        assert!(Tier::Gold.accessible(Feature::Growth));
        assert!(Tier::Gold.accessible(Feature::Dates));
        assert!(Tier::Gold.accessible(Feature::Settings));
        assert!(!Tier::Gold.accessible(Feature::Agent));
        assert!(!Tier::Gold.accessible(Feature::Admin));
    }

    #[test]
    fn test_enterprise_is_superset_of_gold() {
        for feature in Feature::ALL {
            assert!(Tier::Enterprise.accessible(feature));
            if Tier::Gold.accessible(feature) {
                assert!(Tier::Enterprise.accessible(feature));
            }
        }
    }

    #[test]
    fn test_serde_representation() {
        let json = serde_json::to_string(&Tier::Enterprise).unwrap();
        assert_eq!(json, "\"enterprise\"");

        let tier: Tier = serde_json::from_str("\"gold\"").unwrap();
        assert_eq!(tier, Tier::Gold);
    }
}
