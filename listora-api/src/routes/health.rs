/// Health check endpoint
///
/// Reports service liveness and database reachability. Load balancers and
/// uptime monitors hit this, so it stays cheap: one trivial query.
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// `GET /health` and `GET /api/health`
///
/// Returns 200 when the database responds, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match listora_shared::db::pool::health_check(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                version: env!("CARGO_PKG_VERSION"),
                database: "connected",
            }),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    version: env!("CARGO_PKG_VERSION"),
                    database: "unreachable",
                }),
            )
        }
    }
}
