/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `Result<T, ApiError>`; the boundary converts each failure to a status
/// code and a client-safe message. Internal detail (SQL text, source errors)
/// is logged server-side and never reaches the response body.
///
/// # Taxonomy
///
/// | Variant      | Status | Meaning                                     |
/// |--------------|--------|---------------------------------------------|
/// | `Validation` | 400    | malformed input, with per-field messages    |
/// | `Conflict`   | 400    | duplicate unique field (email)              |
/// | `Dependency` | 400    | deletion blocked by existing references     |
/// | `BadRequest` | 400    | other malformed requests                    |
/// | `Unauthorized` | 401  | missing/invalid/expired token               |
/// | `Forbidden`  | 403    | insufficient privilege                      |
/// | `NotFound`   | 404    | referenced id does not exist                |
/// | `Internal`   | 500    | persistence or runtime failure              |
///
/// Nothing is retried; every failure is terminal for its request.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Missing, invalid, or expired credentials (401)
    Unauthorized(String),

    /// Insufficient privilege (403)
    Forbidden(String),

    /// Referenced id does not exist (404)
    NotFound(String),

    /// Duplicate unique field, e.g. email (400)
    Conflict(String),

    /// Deletion blocked by existing references (400)
    Dependency(String),

    /// Request body failed schema validation (400)
    Validation(Vec<ValidationErrorDetail>),

    /// Unexpected persistence or runtime failure (500)
    Internal(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "not_found", "validation_error")
    pub error: String,

    /// Human-readable, client-safe message
    pub message: String,

    /// Per-field validation violations, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Dependency(msg) => write!(f, "Dependency: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, "conflict", msg, None),
            ApiError::Dependency(msg) => {
                (StatusCode::BAD_REQUEST, "dependency_error", msg, None)
            }
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Internal(msg) => {
                // Log the detail; the client gets a generic message.
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Row-not-found maps to 404 so handlers can rely on the distinction between
/// "no such record" and other write failures. Unique-constraint violations
/// on email map to the conflict error the registration flow expects.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("User already exists".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert validator failures to API errors with per-field details
impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(errors)
    }
}

/// Convert token errors to API errors
///
/// All verification failures are unauthenticated responses, never 500.
impl From<projex_shared::auth::jwt::TokenError> for ApiError {
    fn from(err: projex_shared::auth::jwt::TokenError) -> Self {
        use projex_shared::auth::jwt::TokenError;

        match err {
            TokenError::Expired => {
                ApiError::Unauthorized("The token you provided has expired".to_string())
            }
            TokenError::Invalid(_) => {
                ApiError::Unauthorized("The token you provided is not valid".to_string())
            }
            // A signing failure means broken configuration, not a bad caller.
            TokenError::CreateError(msg) => ApiError::Internal(msg),
        }
    }
}

/// Convert password hashing errors to API errors
impl From<projex_shared::auth::password::PasswordError> for ApiError {
    fn from(err: projex_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projex_shared::auth::jwt::TokenError;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation(vec![]).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Dependency("refs".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("no".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("gone".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        let err: ApiError = TokenError::Expired.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err: ApiError = TokenError::Invalid("bad signature".to_string()).into();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        // Signing failure is a config problem, not a caller problem.
        let err: ApiError = TokenError::CreateError("no secret".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_validation_details_serialized() {
        let err = ApiError::Validation(vec![ValidationErrorDetail {
            field: "email".to_string(),
            message: "Invalid email address".to_string(),
        }]);
        assert_eq!(err.to_string(), "Validation failed: 1 errors");
    }
}
