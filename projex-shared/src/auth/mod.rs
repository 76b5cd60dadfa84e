/// Authentication primitives for ProjeX
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: token issuance and validation (HS256, 7-day lifetime)
/// - [`middleware`]: Axum guard resolving a caller identity from a Bearer token
///
/// # Example
///
/// ```no_run
/// use projex_shared::auth::password::{hash_password, verify_password};
/// use projex_shared::auth::jwt::{create_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = create_token(&Claims::new(Uuid::new_v4()), "secret-key")?;
/// # Ok(())
/// # }
/// ```
pub mod jwt;
pub mod middleware;
pub mod password;
