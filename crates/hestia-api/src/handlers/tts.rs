//! Text-to-speech proxy.

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hestia_core::AppError;
use hestia_processing::encode_base64;
use hestia_providers::ProviderError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: String,
    /// Defaults to `alloy`
    pub voice: Option<String>,
    /// `mp3`, `wav` or `ogg`; defaults to `mp3`
    pub format: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResponse {
    pub success: bool,
    pub audio_base64: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpeechFailure {
    pub error: String,
    pub details: String,
}

#[utoipa::path(
    post,
    path = "/api/tts",
    tag = "speech",
    request_body = SpeechRequest,
    responses(
        (status = 200, description = "Synthesized audio", body = SpeechResponse),
        (status = 400, description = "Missing text", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "Speech provider failed", body = SpeechFailure),
    )
)]
#[tracing::instrument(skip(state, body), fields(user_id = %user.user_id, chars = body.text.len()))]
pub async fn synthesize_speech(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<SpeechRequest>,
) -> Result<Response, HttpAppError> {
    if body.text.trim().is_empty() {
        return Err(AppError::InvalidInput("Missing text".to_string()).into());
    }

    let result = state
        .integrations
        .speech
        .synthesize(&body.text, body.voice.as_deref(), body.format.as_deref())
        .await;

    match result {
        Ok(audio) => Ok(Json(SpeechResponse {
            success: true,
            audio_base64: encode_base64(&audio.bytes),
            mime_type: audio.mime_type.to_string(),
        })
        .into_response()),
        Err(ProviderError::MissingKey(var)) => {
            Err(AppError::Internal(format!("{} not set", var)).into())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Speech synthesis failed");
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(SpeechFailure {
                    error: "TTS failed".to_string(),
                    details: e.to_string(),
                }),
            )
                .into_response())
        }
    }
}
