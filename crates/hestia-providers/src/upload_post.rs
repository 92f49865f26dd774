//! Multi-platform video publishing API.

use crate::error::{ProviderError, ProviderResult};
use anyhow::Context;
use hestia_core::models::Platform;
use hestia_core::ProviderConfig;
use serde::Serialize;
use std::time::Duration;

pub const API_KEY_VAR: &str = "UPLOAD_POST_API_KEY";

/// Raw JSON returned by the publishing API; its shape varies per platform.
pub type UploadPostResponse = serde_json::Value;

#[derive(Debug, Clone)]
pub struct UploadPostClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadBody<'a> {
    video_url: &'a str,
    title: &'a str,
    user: &'a str,
    platforms: Vec<&'static str>,
}

impl UploadPostClient {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client for upload-post")?;

        Ok(Self {
            http_client,
            api_key: config.upload_post_api_key.clone(),
            endpoint: config.upload_post_endpoint.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn publish_video(
        &self,
        video_url: &str,
        title: &str,
        user: &str,
        platforms: &[Platform],
    ) -> ProviderResult<UploadPostResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingKey(API_KEY_VAR))?;
        if video_url.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "videoUrl is required".to_string(),
            ));
        }

        let body = UploadBody {
            video_url,
            title,
            user,
            platforms: platforms.iter().map(|p| p.as_str()).collect(),
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e, "Failed to send request to upload-post"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message: format!("upload-post request failed: {} {}", status.as_u16(), text),
            });
        }

        tracing::info!(platforms = platforms.len(), "Video sent to upload-post");

        // An empty or non-JSON success body still counts as published.
        Ok(response
            .json()
            .await
            .unwrap_or_else(|_| serde_json::json!({})))
    }
}

/// Post title: the caller's title, else the first 60 characters of the text, else "Video".
pub fn publish_title(title: Option<&str>, text: &str) -> String {
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    let snippet: String = text.chars().take(60).collect();
    if snippet.is_empty() {
        "Video".to_string()
    } else {
        snippet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestia_core::AppConfig;
    use mockito::Matcher;

    fn client(endpoint: String, key: Option<&str>) -> UploadPostClient {
        let mut config = AppConfig::default().providers;
        config.upload_post_endpoint = endpoint;
        config.upload_post_api_key = key.map(str::to_string);
        UploadPostClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_publish_video_sends_platforms() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/upload")
            .match_header("authorization", "Bearer up-key")
            .match_body(Matcher::Json(serde_json::json!({
                "videoUrl": "https://cdn.example/tour.webm",
                "title": "Open house",
                "user": "default",
                "platforms": ["tiktok", "instagram"]
            })))
            .with_status(200)
            .with_body(r#"{"success":true,"results":{"tiktok":{"id":"t-1"}}}"#)
            .create_async()
            .await;

        let response = client(format!("{}/api/upload", server.url()), Some("up-key"))
            .publish_video(
                "https://cdn.example/tour.webm",
                "Open house",
                "default",
                &[Platform::Tiktok, Platform::Instagram],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response["results"]["tiktok"]["id"], "t-1");
    }

    #[tokio::test]
    async fn test_publish_failure_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/upload")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client(format!("{}/api/upload", server.url()), Some("k"))
            .publish_video("https://cdn.example/v.webm", "t", "u", &[Platform::X])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "upload-post request failed: 500 boom");
    }

    #[tokio::test]
    async fn test_publish_rejects_empty_url_and_missing_key() {
        let with_key = client("http://127.0.0.1:9".to_string(), Some("k"));
        let err = with_key
            .publish_video("", "t", "u", &[Platform::X])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: videoUrl is required");

        let without_key = client("http://127.0.0.1:9".to_string(), None);
        assert!(!without_key.is_configured());
        let err = without_key
            .publish_video("https://v", "t", "u", &[Platform::X])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing UPLOAD_POST_API_KEY");
    }

    #[test]
    fn test_publish_title_fallbacks() {
        assert_eq!(publish_title(Some("Tour"), "ignored"), "Tour");
        assert_eq!(publish_title(None, &"a".repeat(80)).len(), 60);
        assert_eq!(publish_title(Some(""), ""), "Video");
    }
}
