/// JWT token issuance and validation
///
/// Tokens assert "this request is made on behalf of user X". They are signed
/// with HS256 (HMAC-SHA256) using a server-held secret and carry the user id
/// as the `sub` claim.
///
/// # Lifetime
///
/// One authoritative lifetime: **7 days**. The session length a client sees
/// and the token-internal expiry are the same value, so there is no window
/// where a client believes it is logged in but the token has lapsed.
///
/// # Failure semantics
///
/// - Signing failures are configuration errors; the secret is checked at
///   startup so issuance never runs unconfigured.
/// - Validation failures are routine. `TokenError::Expired` is distinguished
///   from other failures for user messaging, but every validation failure
///   maps to an unauthenticated response, never a server error.
///
/// # Example
///
/// ```
/// use projex_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-secret-key-at-least-32-bytes-long!";
///
/// let token = create_token(&Claims::new(user_id), secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim embedded in every token
pub const ISSUER: &str = "projex";

/// Token lifetime in days
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign the token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format, or issuer check failed
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// JWT claims
///
/// `sub` carries the user id; the remaining claims are standard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "projex"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the default 7-day lifetime
    pub fn new(user_id: Uuid) -> Self {
        Self::with_lifetime(user_id, Duration::days(TOKEN_LIFETIME_DAYS))
    }

    /// Creates claims with a custom lifetime
    ///
    /// Negative durations produce an already-expired token, which is useful
    /// in tests.
    pub fn with_lifetime(user_id: Uuid, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// Checks whether the expiry timestamp has passed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs a token from claims
///
/// # Errors
///
/// Returns `TokenError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, expiry, and issuer.
///
/// # Errors
///
/// Returns `TokenError::Expired` for lapsed tokens and `TokenError::Invalid`
/// for anything else (malformed token, bad signature, wrong issuer).
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Resolves the user id from a token, treating every failure as "no identity"
///
/// Callers that do not need to distinguish expiry from malformation use this
/// instead of [`validate_token`].
pub fn resolve_user_id(token: &str, secret: &str) -> Option<Uuid> {
    validate_token(token, secret).ok().map(|claims| claims.sub)
}

/// Extracts claims without verifying the signature
///
/// For non-authoritative inspection only (e.g. showing which account a stale
/// session belonged to). Must never be used to authorize an action.
pub fn decode_unverified(token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    // The decoding key is irrelevant with signature validation disabled.
    let key = DecodingKey::from_secret(&[]);

    let token_data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| TokenError::Invalid(format!("Token decoding failed: {}", e)))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_default_lifetime() {
        let claims = Claims::new(Uuid::new_v4());

        assert_eq!(claims.iss, ISSUER);
        assert!(!claims.is_expired());

        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, Duration::days(TOKEN_LIFETIME_DAYS).num_seconds());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).expect("should create token");

        let claims = validate_token(&token, SECRET).expect("should validate token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = create_token(&Claims::new(Uuid::new_v4()), SECRET).unwrap();

        let result = validate_token(&token, "a-different-secret-entirely");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_validate_malformed_token() {
        let result = validate_token("not.a.token", SECRET);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_lifetime(Uuid::new_v4(), Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_resolve_user_id_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).unwrap();

        assert_eq!(resolve_user_id(&token, SECRET), Some(user_id));
    }

    #[test]
    fn test_resolve_user_id_never_errors() {
        // Expired, garbage, and empty inputs all collapse to "no identity".
        let expired = create_token(
            &Claims::with_lifetime(Uuid::new_v4(), Duration::seconds(-60)),
            SECRET,
        )
        .unwrap();

        assert_eq!(resolve_user_id(&expired, SECRET), None);
        assert_eq!(resolve_user_id("garbage", SECRET), None);
        assert_eq!(resolve_user_id("", SECRET), None);
    }

    #[test]
    fn test_decode_unverified_ignores_signature() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).unwrap();

        // Decoding works without the signing secret.
        let claims = decode_unverified(&token).expect("should decode");
        assert_eq!(claims.sub, user_id);

        // But a tampered check still validates nothing.
        assert!(validate_token(&token, "wrong").is_err());
    }

    #[test]
    fn test_decode_unverified_rejects_garbage() {
        assert!(decode_unverified("definitely-not-a-jwt").is_err());
    }
}
