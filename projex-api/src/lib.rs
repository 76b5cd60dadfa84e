/// ProjeX API server library
///
/// HTTP layer for the ProjeX project and task tracker: routing, request
/// validation, authentication wiring and error shaping. Persistence and the
/// token/password primitives live in `projex-shared`.
///
/// # Modules
///
/// - `app`: application state and router construction
/// - `config`: environment-driven configuration
/// - `error`: unified API error type and response shaping
/// - `middleware`: HTTP middleware (security headers)
/// - `routes`: request handlers
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
