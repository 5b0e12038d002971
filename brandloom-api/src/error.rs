/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which converts to the
/// appropriate status code automatically.
///
/// # Wire format
///
/// Every failure is `{"error": "<message>"}` with a 4xx/5xx status:
///
/// - 400 — validation, field-named ("name is required")
/// - 401 — always "Unauthorized"
/// - 403 — always "Forbidden" (tier gate, admin gate)
/// - 404 — always "Not found"; ownership mismatches produce the SAME
///   response as true absence so existence never leaks
/// - 409 — duplicate email
/// - 500 — always "Internal server error"; the cause is logged, never sent
///
/// # Example
///
/// ```
/// use brandloom_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     Err(ApiError::NotFound)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use brandloom_shared::auth::ownership::OwnershipError;
use brandloom_shared::auth::{jwt::JwtError, password::PasswordError};
use brandloom_shared::mailer::MailerError;
use brandloom_shared::models::voucher::RedeemError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400); the message names the offending field
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized,

    /// Forbidden (403) - tier gate or admin gate
    Forbidden,

    /// Not found (404) - true absence and ownership mismatch alike
    NotFound,

    /// Conflict (409) - e.g. duplicate email
    Conflict(String),

    /// Internal server error (500); the detail is logged, not sent
    InternalError(String),
}

/// Error response format: `{"error": "<message>"}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Forbidden => write!(f, "Forbidden"),
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalError(msg) => {
                // Log the cause server-side; the client gets a generic body
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { error: message });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Ownership mismatches surface as plain not-found
impl From<OwnershipError> for ApiError {
    fn from(_: OwnershipError) -> Self {
        ApiError::NotFound
    }
}

/// Convert token errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        tracing::debug!("Token rejected: {}", err);
        ApiError::Unauthorized
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert mailer errors to API errors
impl From<MailerError> for ApiError {
    fn from(err: MailerError) -> Self {
        ApiError::InternalError(format!("Email delivery failed: {}", err))
    }
}

/// Convert voucher redemption errors to API errors
///
/// Business rejections (inactive, expired, cap) are 400s with a named
/// reason; database failures stay internal.
impl From<RedeemError> for ApiError {
    fn from(err: RedeemError) -> Self {
        match err {
            RedeemError::Database(e) => ApiError::from(e),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("name is required".to_string());
        assert_eq!(err.to_string(), "Bad request: name is required");

        assert_eq!(ApiError::NotFound.to_string(), "Not found");
        assert_eq!(ApiError::Unauthorized.to_string(), "Unauthorized");
    }

    #[test]
    fn test_ownership_error_maps_to_not_found() {
        let err: ApiError = OwnershipError::NotFound.into();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn test_redeem_rejection_is_bad_request() {
        let err: ApiError = RedeemError::CapReached.into();
        match err {
            ApiError::BadRequest(msg) => assert!(msg.contains("limit")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_error_response_shape() {
        let body = ErrorResponse {
            error: "Not found".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"Not found"}"#);
    }
}
