//! HTTP error bodies
//!
//! `IntoResponse` for `AppError` lives in `hestia-api`: the orphan rule forbids implementing
//! axum's trait for a `hestia-core` type here.

use hestia_core::models::{ClassifiedError, ProviderErrorKind};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response format for HTTP APIs
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    pub code: String,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            error_type: None,
            code: code.into(),
            recoverable: false,
            suggested_action: None,
        }
    }
}

/// Body returned when image generation fails for a reason the caller must see.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationErrorResponse {
    pub error: String,
    pub error_type: ProviderErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    pub quota_zero: bool,
}

impl From<&ClassifiedError> for GenerationErrorResponse {
    fn from(err: &ClassifiedError) -> Self {
        Self {
            error: err.message.clone(),
            error_type: err.kind,
            retry_after: err.retry_after_secs,
            quota_zero: err.quota_zero,
        }
    }
}
