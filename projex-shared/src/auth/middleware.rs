/// Authentication guard for Axum
///
/// Gates protected operations on a valid token. The token transport is a
/// single, uniform `Authorization: Bearer <token>` header; there is no cookie
/// fallback. On success the guard inserts [`AuthUser`] into the request
/// extensions so handlers can extract the caller identity.
///
/// The guard makes a reject/allow decision and nothing else: it does not
/// refresh or rotate tokens.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use projex_shared::auth::middleware::{bearer_auth_middleware, AuthUser};
///
/// async fn whoami(Extension(auth): Extension<AuthUser>) -> String {
///     format!("user {}", auth.id)
/// }
///
/// let secret = "a-secret-key-at-least-32-bytes-long!".to_string();
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(move |req, next| {
///         bearer_auth_middleware(secret.clone(), req, next)
///     }));
/// ```
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{validate_token, TokenError};

/// Caller identity resolved by the guard
///
/// Inserted into request extensions after successful token validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthUser {
    /// Authenticated user ID
    pub id: Uuid,
}

/// Error type for the authentication guard
///
/// Expired tokens are distinguished from malformed or badly signed ones for
/// user messaging; both map to 401.
#[derive(Debug)]
pub enum AuthError {
    /// No token was presented
    MissingCredentials,

    /// Authorization header is present but not a Bearer token
    InvalidFormat(String),

    /// Token is malformed or its signature does not verify
    InvalidToken(String),

    /// Token has expired
    Expired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::Expired => (
                StatusCode::UNAUTHORIZED,
                "The token you provided has expired".to_string(),
            ),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Bearer token authentication middleware
///
/// # Errors
///
/// - 401 if no Authorization header is present
/// - 400 if the header is not a Bearer token
/// - 401 if validation fails, with expired tokens called out separately
pub async fn bearer_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        TokenError::Expired => AuthError::Expired,
        _ => AuthError::InvalidToken("The token you provided is not valid".to_string()),
    })?;

    req.extensions_mut().insert(AuthUser { id: claims.sub });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_codes() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("Expected Bearer token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AuthError::InvalidToken("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::Expired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
