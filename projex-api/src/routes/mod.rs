/// HTTP route handlers
///
/// Handlers stay thin: extract, validate, call the shared models, shape the
/// response. Anything that touches SQL lives in `projex_shared::models`.
pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;
