//! Hosted blob store reached over its REST API.
//!
//! Objects are written with `PUT {base}/{pathname}` and removed with `POST {base}/delete`.
//! The store addresses objects by URL, so the URL doubles as the storage key.

use crate::keys::generate_storage_key;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BLOB_API_VERSION: &str = "7";

#[derive(Clone)]
pub struct BlobStorage {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct PutBlobResponse {
    url: Option<String>,
}

impl BlobStorage {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl Storage for BlobStorage {
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject> {
        let pathname = generate_storage_key(folder, filename)?;
        let size = data.len();
        let url = format!("{}/{}", self.api_base, urlencoding::encode(&pathname).replace("%2F", "/"));

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header("x-api-version", BLOB_API_VERSION)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "1")
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Blob request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StorageError::UploadFailed(format!(
                "Blob upload failed: {} {}",
                status.as_u16(),
                text
            )));
        }

        let body: PutBlobResponse = response
            .json()
            .await
            .map_err(|e| StorageError::BackendError(format!("Invalid blob response: {}", e)))?;
        let public_url = body
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| StorageError::BackendError("Blob upload returned no URL".to_string()))?;

        tracing::info!(pathname = %pathname, size_bytes = size, "Blob upload successful");

        Ok(StoredObject {
            key: public_url.clone(),
            url: public_url,
        })
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let response = self
            .client
            .post(format!("{}/delete", self.api_base))
            .bearer_auth(&self.token)
            .header("x-api-version", BLOB_API_VERSION)
            .json(&delete_body(storage_key))
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(format!("Blob request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StorageError::DeleteFailed(format!(
                "Blob delete failed: {} {}",
                status.as_u16(),
                text
            )));
        }
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Blob
    }
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    urls: [&'a str; 1],
}

fn delete_body(url: &str) -> DeleteBody<'_> {
    DeleteBody { urls: [url] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_puts_bytes_and_returns_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/uploads/videos/tour.webm")
            .match_header("authorization", "Bearer blob-token")
            .match_header("x-content-type", "video/webm")
            .with_status(200)
            .with_body(r#"{"url":"https://store.example/uploads/videos/tour-abc.webm","pathname":"uploads/videos/tour-abc.webm"}"#)
            .create_async()
            .await;

        let storage = BlobStorage::new(server.url(), "blob-token").unwrap();
        let stored = storage
            .upload("uploads/videos", "tour.webm", "video/webm", vec![9, 8, 7])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            stored.url,
            "https://store.example/uploads/videos/tour-abc.webm"
        );
        assert_eq!(stored.key, stored.url);
    }

    #[tokio::test]
    async fn test_upload_error_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/uploads/images/a.jpg")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let storage = BlobStorage::new(server.url(), "bad").unwrap();
        let err = storage
            .upload("uploads/images", "a.jpg", "image/jpeg", vec![1])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Upload failed: Blob upload failed: 403 forbidden");
    }

    #[tokio::test]
    async fn test_upload_without_url_is_backend_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/uploads/images/a.jpg")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let storage = BlobStorage::new(server.url(), "t").unwrap();
        let err = storage
            .upload("uploads/images", "a.jpg", "image/jpeg", vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::BackendError(_)));
    }
}
