use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use hestia_core::models::{compute_dashboard_metrics, trend_window_start, DashboardMetrics};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/dashboard/metrics",
    tag = "dashboard",
    responses(
        (status = 200, description = "Income for the current month and the six-month trend", body = DashboardMetrics),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "dashboard_metrics"))]
pub async fn dashboard_metrics(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<DashboardMetrics>, HttpAppError> {
    let now = Utc::now();
    let contracts = state
        .db
        .contracts
        .signed_since(trend_window_start(now))
        .await?;

    Ok(Json(compute_dashboard_metrics(&contracts, now)))
}
