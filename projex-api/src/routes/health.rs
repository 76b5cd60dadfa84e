/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// Reports the server version and whether the database answers a trivial
/// query.
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status: "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status: "connected" or "disconnected"
    pub database: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database_connected = projex_shared::db::pool::health_check(&state.db).await.is_ok();

    Ok(Json(HealthResponse {
        status: if database_connected {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_connected {
            "connected".to_string()
        } else {
            "disconnected".to_string()
        },
    }))
}
