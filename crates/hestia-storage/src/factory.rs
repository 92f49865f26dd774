use crate::{BlobStorage, LocalStorage, Storage, StorageBackend, StorageError, StorageResult};
use hestia_core::StorageConfig;
use std::sync::Arc;

/// Build the configured storage backend
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    match config.backend {
        StorageBackend::Blob => {
            let token = config.blob_token.clone().ok_or_else(|| {
                StorageError::ConfigError("BLOB_READ_WRITE_TOKEN not configured".to_string())
            })?;
            let storage = BlobStorage::new(config.blob_api_base.clone(), token)?;
            Ok(Arc::new(storage))
        }
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestia_core::AppConfig;

    #[tokio::test]
    async fn test_blob_backend_requires_token() {
        let config = StorageConfig {
            backend: StorageBackend::Blob,
            blob_token: None,
            ..AppConfig::default().storage
        };
        let err = create_storage(&config).await.err().unwrap();
        assert!(matches!(err, StorageError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_local_backend_selected() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Local,
            local_storage_path: Some(dir.path().display().to_string()),
            local_storage_base_url: Some("http://localhost:3000/media".to_string()),
            ..AppConfig::default().storage
        };
        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }
}
