//! Social media: captions, publishing and slideshow planning.

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use hestia_core::models::{
    CaptionLocale, NewSocialPost, Platform, ScheduleStatus, SocialSchedule, UploadResult,
};
use hestia_core::AppError;
use hestia_providers::upload_post::publish_title;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const DEFAULT_MANAGED_USER: &str = "default";
const DEFAULT_SECONDS_PER_SLIDE: f64 = 2.2;
const SLIDESHOW_HINT: &str = "Generate on client for now";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRequest {
    #[serde(default)]
    pub locale: CaptionLocale,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CaptionResponse {
    pub ok: bool,
    pub caption: String,
}

#[utoipa::path(
    post,
    path = "/api/social/caption",
    tag = "social",
    request_body = CaptionRequest,
    responses(
        (status = 200, description = "Generated caption", body = CaptionResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "Caption generation failed", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state, body), fields(user_id = %user.user_id, locale = ?body.locale))]
pub async fn generate_caption(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<CaptionRequest>,
) -> Result<Json<CaptionResponse>, HttpAppError> {
    let caption = state
        .generation
        .captions
        .generate_caption(body.locale, &body.context)
        .await
        .map_err(|e| AppError::upstream("gemini", format!("{:#}", e)))?;

    Ok(Json(CaptionResponse { ok: true, caption }))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    pub text: String,
    pub media_url: Option<String>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    /// Absent means now
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub publish_now: bool,
    /// Public video URL; `mediaUrl` is used when absent
    pub video_url: Option<String>,
    pub title: Option<String>,
    /// Account handle on the publishing service
    pub managed_user: Option<String>,
}

impl PublishRequest {
    fn public_video_url(&self) -> Option<&str> {
        self.video_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.media_url.as_deref().filter(|u| !u.is_empty()))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub ok: bool,
    pub post_id: Uuid,
    pub schedules: Vec<SocialSchedule>,
    pub upload_results: Vec<UploadResult>,
}

#[utoipa::path(
    post,
    path = "/api/social/publish",
    tag = "social",
    request_body = PublishRequest,
    responses(
        (status = 201, description = "Post stored and scheduled", body = PublishResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(user_id = %user.user_id, platforms = body.platforms.len(), publish_now = body.publish_now)
)]
pub async fn publish_post(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<PublishRequest>,
) -> Result<(StatusCode, Json<PublishResponse>), HttpAppError> {
    if body.text.is_empty() || body.platforms.is_empty() {
        return Err(AppError::InvalidInput("Invalid payload".to_string()).into());
    }

    let status = ScheduleStatus::for_request(body.scheduled_at, body.publish_now);
    let (post, mut schedules) = state
        .db
        .social
        .create_post_with_schedules(NewSocialPost {
            user_id: user.user_id.clone(),
            content_text: body.text.clone(),
            media_url: body.media_url.clone().filter(|u| !u.is_empty()),
            platforms: body.platforms.clone(),
            scheduled_at: body.scheduled_at.unwrap_or_else(Utc::now),
            status,
        })
        .await?;

    let mut upload_results = Vec::new();
    if let (true, Some(video_url)) = (body.publish_now, body.public_video_url()) {
        let result = publish_now(&state, &body, video_url).await;
        let failed = result.error.is_some();
        let message = result
            .error
            .clone()
            .or_else(|| result.id.clone())
            .unwrap_or_else(|| "Published".to_string());

        for schedule in &mut schedules {
            if let Err(e) = state
                .db
                .social
                .record_publish_result(schedule.id, &message, failed)
                .await
            {
                tracing::warn!(schedule_id = %schedule.id, error = %e, "Failed to record publish result");
                continue;
            }
            schedule.publish_result = Some(message.clone());
            if failed {
                schedule.status = ScheduleStatus::Failed;
            }
        }
        upload_results.push(result);
    }

    tracing::info!(post_id = %post.id, schedules = schedules.len(), "Social post created");

    Ok((
        StatusCode::CREATED,
        Json(PublishResponse {
            ok: true,
            post_id: post.id,
            schedules,
            upload_results,
        }),
    ))
}

/// Send the video to the publishing service. Failures become an `error` entry, never a
/// request error.
async fn publish_now(state: &AppState, body: &PublishRequest, video_url: &str) -> UploadResult {
    let platform = body.platforms[0];
    let title = publish_title(body.title.as_deref(), &body.text);
    let user = body
        .managed_user
        .as_deref()
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_MANAGED_USER);

    match state
        .integrations
        .upload_post
        .publish_video(video_url, &title, user, &body.platforms)
        .await
    {
        Ok(response) => UploadResult {
            platform,
            id: response.get("id").and_then(|id| match id {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Immediate publish failed");
            UploadResult {
                platform,
                id: None,
                error: Some(e.to_string()),
            }
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlideshowRequest {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, rename = "prefer4K")]
    pub prefer_4k: bool,
    pub seconds_per_slide: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlideshowResponse {
    pub ok: bool,
    pub hint: String,
    #[serde(rename = "prefer4K")]
    pub prefer_4k: bool,
    pub seconds_per_slide: f64,
}

#[utoipa::path(
    post,
    path = "/api/social/video",
    tag = "social",
    request_body = SlideshowRequest,
    responses(
        (status = 200, description = "Slideshow plan; rendering happens on the client", body = SlideshowResponse),
        (status = 400, description = "No images", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(body), fields(user_id = %user.user_id, images = body.images.len()))]
pub async fn plan_slideshow(
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<SlideshowRequest>,
) -> Result<Json<SlideshowResponse>, HttpAppError> {
    if body.images.is_empty() {
        return Err(AppError::InvalidInput("No images".to_string()).into());
    }

    Ok(Json(SlideshowResponse {
        ok: true,
        hint: SLIDESHOW_HINT.to_string(),
        prefer_4k: body.prefer_4k,
        seconds_per_slide: body
            .seconds_per_slide
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_SECONDS_PER_SLIDE),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_url_falls_back_to_media_url() {
        let body: PublishRequest = serde_json::from_value(serde_json::json!({
            "text": "New listing",
            "platforms": ["tiktok"],
            "mediaUrl": "https://cdn.example/tour.webm",
            "videoUrl": ""
        }))
        .unwrap();
        assert_eq!(body.public_video_url(), Some("https://cdn.example/tour.webm"));
        assert!(!body.publish_now);
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        let parsed = serde_json::from_value::<PublishRequest>(serde_json::json!({
            "text": "x",
            "platforms": ["myspace"]
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_slideshow_wire_names() {
        let body: SlideshowRequest =
            serde_json::from_value(serde_json::json!({"images": ["a"], "prefer4K": true})).unwrap();
        assert!(body.prefer_4k);
        assert_eq!(body.seconds_per_slide, None);
    }
}
