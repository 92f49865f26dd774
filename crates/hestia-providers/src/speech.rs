//! Text-to-speech proxy client.

use crate::error::{ProviderError, ProviderResult};
use anyhow::Context;
use hestia_core::ProviderConfig;
use serde::Serialize;
use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_VOICE: &str = "alloy";
pub const DEFAULT_FORMAT: &str = "mp3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

pub fn audio_mime_type(format: &str) -> &'static str {
    match format {
        "wav" => "audio/wav",
        "opus" | "ogg" => "audio/ogg",
        _ => "audio/mpeg",
    }
}

#[derive(Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Clone)]
pub struct SpeechClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
}

impl SpeechClient {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client for speech API")?;

        Ok(Self {
            http_client,
            api_key: config.openai_api_key.clone(),
            api_base: config.openai_api_base.trim_end_matches('/').to_string(),
            model: config.openai_tts_model.clone(),
        })
    }

    pub async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
        format: Option<&str>,
    ) -> ProviderResult<SynthesizedAudio> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingKey(API_KEY_VAR))?;
        let format = format.unwrap_or(DEFAULT_FORMAT);
        let body = SpeechBody {
            model: &self.model,
            input: text,
            voice: voice.unwrap_or(DEFAULT_VOICE),
            response_format: format,
        };

        let response = self
            .http_client
            .post(format!("{}/v1/audio/speech", self.api_base))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e, "Failed to send request to speech API"))?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message: details,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::transport(e, "Failed to read speech audio"))?;

        tracing::debug!(chars = text.chars().count(), bytes = bytes.len(), "Speech synthesized");

        Ok(SynthesizedAudio {
            bytes: bytes.to_vec(),
            mime_type: audio_mime_type(format),
        })
    }
}
