use async_trait::async_trait;
use hestia_core::models::{ClassifiedError, GeneratedImage, StyleParams};

/// Image generation backend.
///
/// Failures are never raised as opaque errors: every failure is classified so the caller
/// can decide between retrying, falling back and surfacing it.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        image: &[u8],
        mime_type: &str,
        params: &StyleParams,
    ) -> Result<GeneratedImage, ClassifiedError>;
}
