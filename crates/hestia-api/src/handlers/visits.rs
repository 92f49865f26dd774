//! Visit scheduling.

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use axum::{http::StatusCode, Json};
use hestia_core::models::VisitRequest;
use hestia_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitScheduledResponse {
    pub ok: bool,
    pub when: String,
    /// Present when a property title and a valid date and time were given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_url: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/visits",
    tag = "visits",
    request_body = VisitRequest,
    responses(
        (status = 201, description = "Visit accepted", body = VisitScheduledResponse),
        (status = 400, description = "Missing date or time", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(body), fields(user_id = %user.user_id))]
pub async fn schedule_visit(
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<VisitRequest>,
) -> Result<(StatusCode, Json<VisitScheduledResponse>), HttpAppError> {
    body.validate().map_err(AppError::from)?;

    let calendar_url = body.calendar_url();
    if calendar_url.is_none() {
        tracing::debug!(date = %body.date, time = %body.time, "No calendar link for visit");
    }

    Ok((
        StatusCode::CREATED,
        Json(VisitScheduledResponse {
            ok: true,
            when: body.when(),
            calendar_url,
        }),
    ))
}
