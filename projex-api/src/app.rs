/// Application state and router builder
///
/// # Route map
///
/// ```text
/// /
/// ├── GET  /health                 # liveness + database check (public)
/// ├── /auth/
/// │   ├── POST /register           # public
/// │   ├── POST /login              # public
/// │   └── GET  /me                 # requires token
/// ├── /users                       # public profile management
/// │   ├── GET /
/// │   └── GET/PUT/DELETE /:id
/// ├── /projects
/// │   ├── GET  /                   # public
/// │   ├── GET  /:id                # public
/// │   ├── POST /                   # requires token
/// │   └── PUT/DELETE /:id          # requires token
/// └── /task
///     ├── GET  /                   # public
///     ├── GET  /:id                # public
///     ├── POST /                   # requires token
///     └── PUT/DELETE /:id          # requires token
/// ```
///
/// Protected routes check only that the token is valid; they do not check
/// resource ownership. That is a deliberate single-shared-workspace policy,
/// not an oversight (see DESIGN.md).
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Request logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Bearer token guard (per-route)
use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use projex_shared::auth::middleware::bearer_auth_middleware;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; Arc keeps the clone
/// cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the administrative registration key, if configured
    pub fn admin_registration_key(&self) -> Option<&str> {
        self.config.admin.registration_key.as_deref()
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/users", get(routes::users::list_users))
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route("/projects", get(routes::projects::list_projects))
        .route("/projects/:id", get(routes::projects::get_project))
        .route("/task", get(routes::tasks::list_tasks))
        .route("/task/:id", get(routes::tasks::get_task));

    // One transport, applied uniformly: Authorization: Bearer <token>.
    let secret = state.config.jwt.secret.clone();
    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route("/projects", post(routes::projects::create_project))
        .route(
            "/projects/:id",
            axum::routing::put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/task", post(routes::tasks::create_task))
        .route(
            "/task/:id",
            axum::routing::put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route_layer(axum::middleware::from_fn(move |req, next| {
            bearer_auth_middleware(secret.clone(), req, next)
        }));

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new())
        .with_state(state)
}
