use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use std::sync::Arc;

use super::AppState;

/// `GET /api/health/live`
///
/// Lightweight liveness probe to indicate the API process is running.
pub async fn live() -> impl IntoResponse {
    Json(json!({ "status": "alive" }))
}

/// `GET /api/health/ready`
///
/// Readiness probe that checks database connectivity.
pub async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_ready = state.store.ping().await.is_ok();

    let status = if db_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if db_ready { "ready" } else { "not_ready" },
            "database": db_ready,
        })),
    )
}
