/// Admin console endpoints
///
/// Gated by the combined check the dashboard uses: the caller must be an
/// admin by role OR on the enterprise tier.
///
/// # Endpoints
///
/// - `GET /api/admin/users` - List all accounts (paginated)
/// - `PUT /api/admin/users` - Change an account's name, tier, or role
///   (`id` in body)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::required,
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use brandloom_shared::{
    access::{Role, Tier},
    auth::middleware::AuthContext,
    models::user::{UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User list query (pagination)
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Update user request; `id` names the target account
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub tier: Option<String>,
    pub role: Option<String>,
}

/// User list response wrapper
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
    pub total: i64,
}

/// Single user response wrapper
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Rejects callers outside the admin gate
fn require_admin(auth: &AuthContext) -> Result<(), ApiError> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// List all accounts, newest first
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<UsersResponse>> {
    require_admin(&auth)?;

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let users = User::list(&state.db, limit, offset).await?;
    let total = User::count(&state.db).await?;

    Ok(Json(UsersResponse { users, total }))
}

/// Change an account's name, tier, or role
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    require_admin(&auth)?;

    let id = required(req.id, "id")?;

    let tier = match req.tier {
        None => None,
        Some(s) => Some(
            Tier::parse(&s).ok_or_else(|| ApiError::BadRequest("tier is invalid".to_string()))?,
        ),
    };

    let role = match req.role {
        None => None,
        Some(s) => Some(
            Role::parse(&s).ok_or_else(|| ApiError::BadRequest("role is invalid".to_string()))?,
        ),
    };

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            name: req.name,
            tier,
            role,
        },
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(UserResponse { user }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandloom_shared::auth::jwt::{Claims, TokenType};

    fn auth(tier: Tier, role: Role) -> AuthContext {
        AuthContext::from_claims(&Claims::new(Uuid::new_v4(), tier, role, TokenType::Access))
    }

    #[test]
    fn test_admin_gate_combines_role_and_tier() {
        assert!(require_admin(&auth(Tier::Basic, Role::Admin)).is_ok());
        assert!(require_admin(&auth(Tier::Enterprise, Role::User)).is_ok());
        assert!(matches!(
            require_admin(&auth(Tier::Gold, Role::User)),
            Err(ApiError::Forbidden)
        ));
    }
}
