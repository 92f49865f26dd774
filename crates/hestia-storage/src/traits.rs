//! Storage abstraction shared by the blob and local backends.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Location of a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Backend-internal key, used for deletion
    pub key: String,
    /// Publicly reachable URL
    pub url: String,
}

/// Media storage used by the upload routes.
///
/// Keys have the form `{folder}/{filename}` and never contain `..` or a leading `/`.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject>;

    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    fn backend_type(&self) -> StorageBackend;
}

impl From<StorageError> for hestia_core::AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => hestia_core::AppError::InvalidInput(msg),
            StorageError::NotFound(msg) => hestia_core::AppError::NotFound(msg),
            other => hestia_core::AppError::Storage(other.to_string()),
        }
    }
}
