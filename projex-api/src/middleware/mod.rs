/// HTTP middleware for the API server
///
/// - `security`: security-related response headers
///
/// The authentication guard lives in `projex_shared::auth::middleware` and
/// is wired up per-route in `app.rs`.
pub mod security;
