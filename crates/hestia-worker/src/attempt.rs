//! One generator call under the quality profile's deadline, and local fallback rendering.

use hestia_core::models::{ClassifiedError, GeneratedImage, StyleParams};
use hestia_processing::{FallbackRenderer, FallbackStyle};
use hestia_providers::ImageGenerator;
use std::sync::Arc;

pub(crate) async fn generate_with_deadline(
    generator: &Arc<dyn ImageGenerator>,
    image: &[u8],
    mime_type: &str,
    params: &StyleParams,
) -> Result<GeneratedImage, ClassifiedError> {
    let deadline = params.quality.unwrap_or_default().attempt_timeout();
    match tokio::time::timeout(deadline, generator.generate(image, mime_type, params)).await {
        Ok(result) => result,
        Err(_) => Err(ClassifiedError::unknown(format!(
            "Image generation timed out after {}s",
            deadline.as_secs()
        ))),
    }
}

/// Render a fallback off the async runtime. `None` when the source cannot be decoded.
pub(crate) async fn render_fallback(image: &[u8], style: FallbackStyle) -> Option<GeneratedImage> {
    let bytes = image.to_vec();
    let rendered =
        tokio::task::spawn_blocking(move || FallbackRenderer.render(&bytes, style)).await;

    match rendered {
        Ok(Ok(image)) => Some(image),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, ?style, "Fallback rendering failed");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "Fallback rendering task panicked");
            None
        }
    }
}
