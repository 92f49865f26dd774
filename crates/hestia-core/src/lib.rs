//! Hestia Core Library
//!
//! Domain models, error types and configuration shared by every Hestia crate.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AppConfig, BaseConfig, Config, ProviderConfig, RetryConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
