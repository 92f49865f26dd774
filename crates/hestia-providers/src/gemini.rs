//! Google Generative Language API client: image generation and caption text.

use crate::classify::classify_error_text;
use crate::generator::ImageGenerator;
use crate::prompts::{caption_prompt, image_prompt};
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hestia_core::models::{
    CaptionLocale, ClassifiedError, GeneratedImage, QualityProfile, StyleParams,
};
use hestia_core::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

pub const MISSING_KEY_MESSAGE: &str =
    "GEMINI_API_KEY is not set. Add it to your .env file and restart the server.";
pub const NO_IMAGE_MESSAGE: &str = "No enhanced image was generated";

#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    image_model: String,
    image_model_ultra: String,
    text_model: String,
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            .field("image_model", &self.image_model)
            .field("has_key", &self.api_key.is_some())
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StreamBody {
    Chunks(Vec<ResponseChunk>),
    Single(ResponseChunk),
}

#[derive(Deserialize, Default)]
struct ResponseChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

impl ResponseChunk {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .iter()
            .take(1)
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client for Gemini API")?;

        Ok(Self {
            http_client,
            api_key: config.gemini_api_key.clone(),
            api_base: config.gemini_api_base.trim_end_matches('/').to_string(),
            image_model: config.gemini_image_model.clone(),
            image_model_ultra: config.gemini_image_model_ultra.clone(),
            text_model: config.gemini_text_model.clone(),
        })
    }

    /// `ultra` uses the higher-fidelity model.
    pub fn model_for(&self, quality: Option<QualityProfile>) -> &str {
        match quality {
            Some(QualityProfile::Ultra) => &self.image_model_ultra,
            _ => &self.image_model,
        }
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.api_base, model, method)
    }

    /// Short social-media caption for a listing.
    pub async fn generate_caption(&self, locale: CaptionLocale, context: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!(MISSING_KEY_MESSAGE))?;
        let prompt = caption_prompt(locale, context);
        let body = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart::Text { text: &prompt }],
            }],
            generation_config: None,
        };

        let response = self
            .http_client
            .post(self.endpoint(&self.text_model, "generateContent"))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .context("Failed to send caption request to Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Gemini caption request failed: {} - {}",
                status,
                error_text
            ));
        }

        let chunk: ResponseChunk = response
            .json()
            .await
            .context("Failed to parse Gemini caption response")?;
        let caption: String = chunk
            .parts()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string();

        Ok(caption)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(
        &self,
        image: &[u8],
        mime_type: &str,
        params: &StyleParams,
    ) -> Result<GeneratedImage, ClassifiedError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ClassifiedError::api_error(MISSING_KEY_MESSAGE));
        };

        let model = self.model_for(params.quality);
        let prompt = image_prompt(params);
        let body = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![
                    RequestPart::Text { text: &prompt },
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: Some(mime_type.to_string()),
                            data: Some(STANDARD.encode(image)),
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            }),
        };

        tracing::debug!(
            model = %model,
            redesign = params.is_redesign(),
            input_bytes = image.len(),
            "Calling image generation model"
        );

        let response = self
            .http_client
            .post(self.endpoint(model, "streamGenerateContent"))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_error_text(&e.to_string(), e.status().map(|s| s.as_u16())))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify_error_text(&e.to_string(), Some(status.as_u16())))?;

        if !status.is_success() {
            tracing::warn!(status = %status, "Image generation request failed");
            return Err(classify_error_text(&text, Some(status.as_u16())));
        }

        let chunks = match serde_json::from_str::<StreamBody>(&text) {
            Ok(StreamBody::Chunks(chunks)) => chunks,
            Ok(StreamBody::Single(chunk)) => vec![chunk],
            Err(e) => {
                return Err(ClassifiedError::unknown(format!(
                    "Failed to parse generation response: {}",
                    e
                )))
            }
        };

        let inline = chunks
            .iter()
            .flat_map(|chunk| chunk.parts())
            .find_map(|part| part.inline_data.as_ref().filter(|d| d.data.is_some()));

        let Some(inline) = inline else {
            return Err(ClassifiedError::unknown(NO_IMAGE_MESSAGE));
        };

        let bytes = inline
            .data
            .as_deref()
            .map(|d| STANDARD.decode(d))
            .transpose()
            .map_err(|e| ClassifiedError::unknown(format!("Invalid image payload: {}", e)))?
            .unwrap_or_default();

        if bytes.is_empty() {
            return Err(ClassifiedError::unknown(NO_IMAGE_MESSAGE));
        }

        Ok(GeneratedImage {
            bytes,
            mime_type: inline
                .mime_type
                .clone()
                .unwrap_or_else(|| mime_type.to_string()),
        })
    }
}
