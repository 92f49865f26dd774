//! Single-image enhancement (or single-theme redesign when a theme is given).

use crate::auth::AuthUser;
use crate::error::{generation_failure, ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::image_input::{decode_image, prepare_for_profile};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use hestia_core::models::{
    DesignTheme, EnhancementType, Intensity, QualityProfile, RoomType, StyleParams,
};
use hestia_core::AppError;
use hestia_infra::GenerationErrorResponse;
use hestia_processing::encode_base64;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceImageRequest {
    #[serde(default)]
    pub image_data: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub enhancement_type: EnhancementType,
    #[serde(default)]
    pub room_type: Option<RoomType>,
    /// Switches the prompt to a redesign in this theme
    #[serde(default)]
    pub design_theme: Option<DesignTheme>,
    #[serde(default)]
    pub variant_seed: Option<u32>,
    #[serde(default)]
    pub intensity: Option<Intensity>,
    #[serde(default)]
    pub quality: Option<QualityProfile>,
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

impl EnhanceImageRequest {
    fn style(&self) -> StyleParams {
        StyleParams {
            enhancement: self.enhancement_type,
            room: self.room_type.unwrap_or_default(),
            theme: self.design_theme,
            intensity: self.intensity,
            ..Default::default()
        }
        .with_quality(self.quality)
        .with_seed(self.variant_seed)
        .with_custom_prompt(self.custom_prompt.clone())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceImageResponse {
    pub success: bool,
    pub enhanced_image_data: String,
    pub mime_type: String,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub attempts: u32,
}

#[utoipa::path(
    post,
    path = "/api/enhance-image",
    tag = "generation",
    request_body = EnhanceImageRequest,
    responses(
        (status = 200, description = "Enhanced image, possibly a local fallback", body = EnhanceImageResponse),
        (status = 400, description = "Missing image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 402, description = "Insufficient credits", body = ErrorResponse),
        (status = 502, description = "Generation failed", body = GenerationErrorResponse),
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(user_id = %user.user_id, theme = ?body.design_theme, operation = "enhance_image")
)]
pub async fn enhance_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<EnhanceImageRequest>,
) -> Result<Response, HttpAppError> {
    if body.image_data.trim().is_empty() || body.mime_type.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Missing required fields: imageData and mimeType".to_string(),
        )
        .into());
    }

    let style = body.style();
    let bytes = decode_image(&body.image_data)?;
    let prepared = prepare_for_profile(bytes, &body.mime_type, body.quality).await?;

    match state
        .generation
        .enhancer
        .run(&prepared.bytes, &prepared.mime_type, &style)
        .await
    {
        Ok(outcome) => {
            let response = EnhanceImageResponse {
                success: true,
                enhanced_image_data: encode_base64(&outcome.image.bytes),
                mime_type: outcome.image.mime_type,
                fallback: outcome.fallback.is_some(),
                note: outcome.fallback.map(|f| f.note),
                attempts: outcome.attempts,
            };
            Ok(Json(response).into_response())
        }
        Err(err) => Ok(generation_failure(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_turns_enhancement_into_redesign() {
        let body: EnhanceImageRequest = serde_json::from_value(serde_json::json!({
            "imageData": "AQID",
            "mimeType": "image/png",
            "roomType": "kitchen",
            "designTheme": "industrial",
            "customPrompt": "   "
        }))
        .unwrap();

        let style = body.style();
        assert!(style.is_redesign());
        assert_eq!(style.room, RoomType::Kitchen);
        assert_eq!(style.custom_prompt, None);
    }

    #[test]
    fn test_defaults_to_professional_enhancement() {
        let body: EnhanceImageRequest =
            serde_json::from_value(serde_json::json!({"imageData": "AQID", "mimeType": "image/png"}))
                .unwrap();
        let style = body.style();
        assert!(!style.is_redesign());
        assert_eq!(style.enhancement, EnhancementType::Professional);
        assert_eq!(style.room, RoomType::Other);
    }
}
