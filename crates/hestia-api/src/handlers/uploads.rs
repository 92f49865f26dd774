//! Data-URL uploads into the configured object store.

use crate::auth::AuthUser;
use crate::constants::{IMAGE_FOLDER, VIDEO_FOLDER};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use hestia_core::AppError;
use hestia_processing::parse_data_url;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";
const DEFAULT_VIDEO_TYPE: &str = "video/webm";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataUrlUpload {
    /// `data:<type>;base64,<payload>`
    #[serde(default)]
    pub data_url: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub ok: bool,
    pub url: String,
}

fn default_image_name(content_type: &str, millis: i64) -> String {
    let ext = if content_type.contains("png") { "png" } else { "jpg" };
    format!("image-{}.{}", millis, ext)
}

fn default_video_name(_content_type: &str, millis: i64) -> String {
    format!("room-redesign-{}.webm", millis)
}

async fn store_data_url(
    state: &AppState,
    body: DataUrlUpload,
    folder: &str,
    default_type: &str,
    default_name: fn(&str, i64) -> String,
) -> Result<Json<UploadResponse>, HttpAppError> {
    if !body.data_url.starts_with("data:") {
        return Err(AppError::InvalidInput("Invalid dataUrl".to_string()).into());
    }

    let parsed = parse_data_url(&body.data_url, default_type)?;
    let name = body
        .file_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| default_name(&parsed.content_type, Utc::now().timestamp_millis()));

    let stored = state
        .storage
        .upload(folder, &name, &parsed.content_type, parsed.bytes)
        .await?;

    Ok(Json(UploadResponse {
        ok: true,
        url: stored.url,
    }))
}

#[utoipa::path(
    post,
    path = "/api/upload-image",
    tag = "uploads",
    request_body = DataUrlUpload,
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Invalid dataUrl", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state, body), fields(user_id = %user.user_id, operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<DataUrlUpload>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    store_data_url(&state, body, IMAGE_FOLDER, DEFAULT_IMAGE_TYPE, default_image_name).await
}

#[utoipa::path(
    post,
    path = "/api/upload-video",
    tag = "uploads",
    request_body = DataUrlUpload,
    responses(
        (status = 200, description = "Video stored", body = UploadResponse),
        (status = 400, description = "Invalid dataUrl", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state, body), fields(user_id = %user.user_id, operation = "upload_video"))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<DataUrlUpload>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    store_data_url(&state, body, VIDEO_FOLDER, DEFAULT_VIDEO_TYPE, default_video_name).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        assert_eq!(default_image_name("image/png", 42), "image-42.png");
        assert_eq!(default_image_name("image/webp", 42), "image-42.jpg");
        assert_eq!(default_video_name("video/mp4", 7), "room-redesign-7.webm");
    }
}
