//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the database answers.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (ready, database) = match tokio::time::timeout(
        READINESS_TIMEOUT,
        sqlx::query("SELECT 1").execute(&state.db.pool),
    )
    .await
    {
        Ok(Ok(_)) => (true, "ready".to_string()),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database readiness check failed");
            (false, format!("not_ready: {}", e))
        }
        Err(_) => {
            tracing::error!("Database readiness check timed out");
            (false, "timeout".to_string())
        }
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status = if ready { "ready" } else { "not_ready" };

    (
        status_code,
        Json(serde_json::json!({ "status": status, "database": database })),
    )
}
