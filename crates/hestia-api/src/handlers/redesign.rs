//! Multi-theme room redesign.

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::image_input::{decode_image, prepare_for_profile};
use axum::{extract::State, Json};
use hestia_core::models::{
    DesignTheme, Intensity, ProviderErrorKind, QualityProfile, RedesignRequest, RedesignSummary,
    RoomType, ThemeResult,
};
use hestia_core::AppError;
use hestia_processing::encode_base64;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedesignRoomRequest {
    /// Base64 image, bare or as a data URL
    #[serde(default)]
    pub image_data: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub room_type: Option<RoomType>,
    /// 1-4 themes; extra entries are ignored
    #[serde(default)]
    pub themes: Vec<DesignTheme>,
    #[serde(default)]
    pub variant_seed: Option<u32>,
    #[serde(default)]
    pub intensity: Option<Intensity>,
    #[serde(default)]
    pub quality: Option<QualityProfile>,
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemeResultBody {
    pub theme: DesignTheme,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced_image_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// True when the image was rendered locally instead of by the model
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ProviderErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_zero: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedesignRoomResponse {
    /// At least one theme produced an image
    pub success: bool,
    pub results: Vec<ThemeResultBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ProviderErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    pub quota_zero: bool,
}

impl From<&ThemeResult> for ThemeResultBody {
    fn from(result: &ThemeResult) -> Self {
        match result {
            ThemeResult::Success {
                theme,
                image,
                fallback,
            } => Self {
                theme: *theme,
                success: true,
                enhanced_image_data: Some(encode_base64(&image.bytes)),
                mime_type: Some(image.mime_type.clone()),
                fallback: fallback.is_some(),
                note: fallback.as_ref().map(|f| f.note.clone()),
                error: None,
                error_type: fallback.as_ref().map(|f| f.cause.kind),
                retry_after: fallback.as_ref().and_then(|f| f.cause.retry_after_secs),
                quota_zero: None,
            },
            ThemeResult::Failure {
                theme,
                error,
                fallback,
            } => Self {
                theme: *theme,
                success: false,
                enhanced_image_data: fallback.as_ref().map(|img| encode_base64(&img.bytes)),
                mime_type: fallback.as_ref().map(|img| img.mime_type.clone()),
                fallback: fallback.is_some(),
                note: None,
                error: Some(error.message.clone()),
                error_type: Some(error.kind),
                retry_after: error.retry_after_secs,
                quota_zero: error.quota_zero.then_some(true),
            },
        }
    }
}

impl From<&RedesignSummary> for RedesignRoomResponse {
    fn from(summary: &RedesignSummary) -> Self {
        let issue = summary.throttling_issue();
        Self {
            success: summary.success(),
            results: summary.results.iter().map(ThemeResultBody::from).collect(),
            error_type: issue.map(|e| e.kind),
            retry_after: issue.and_then(|e| e.retry_after_secs),
            quota_zero: issue.is_some_and(|e| e.quota_zero),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/redesign-room",
    tag = "generation",
    request_body = RedesignRoomRequest,
    responses(
        (status = 200, description = "Per-theme results; partial failures are reported inline", body = RedesignRoomResponse),
        (status = 400, description = "Missing image or themes", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 402, description = "Insufficient credits", body = ErrorResponse),
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(user_id = %user.user_id, themes = body.themes.len(), operation = "redesign_room")
)]
pub async fn redesign_room(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<RedesignRoomRequest>,
) -> Result<Json<RedesignRoomResponse>, HttpAppError> {
    if body.image_data.trim().is_empty() || body.mime_type.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Missing required fields: imageData and mimeType".to_string(),
        )
        .into());
    }

    let bytes = decode_image(&body.image_data)?;
    let mut request = RedesignRequest::new(bytes, body.mime_type, body.themes)?
        .with_room(body.room_type.unwrap_or_default())
        .with_intensity(body.intensity.unwrap_or_default())
        .with_quality(body.quality)
        .with_seed(body.variant_seed)
        .with_custom_prompt(body.custom_prompt);

    let image = std::mem::take(&mut request.image);
    let prepared = prepare_for_profile(image, &request.mime_type, request.quality).await?;
    request.image = prepared.bytes;
    request.mime_type = prepared.mime_type;

    let summary = state.generation.orchestrator.run(&request).await;
    Ok(Json(RedesignRoomResponse::from(&summary)))
}
