//! Single-image enhancement with up to `max_attempts` tries and a local fallback.

use crate::attempt::{generate_with_deadline, render_fallback};
use crate::policy::RetryPolicy;
use hestia_core::models::{ClassifiedError, FallbackInfo, GeneratedImage, StyleParams};
use hestia_processing::FallbackStyle;
use hestia_providers::ImageGenerator;
use std::sync::Arc;

pub const QUOTA_ZERO_NOTE: &str =
    "Google AI free-tier quota is 0. Displaying locally enhanced version.";
pub const QUOTA_EXHAUSTED_NOTE: &str =
    "Google AI quota exceeded. Displaying locally enhanced version.";

#[derive(Debug, Clone)]
pub struct EnhancementOutcome {
    pub image: GeneratedImage,
    pub fallback: Option<FallbackInfo>,
    pub attempts: u32,
}

#[derive(Clone)]
pub struct EnhancementRunner {
    generator: Arc<dyn ImageGenerator>,
    policy: RetryPolicy,
}

impl EnhancementRunner {
    pub fn new(generator: Arc<dyn ImageGenerator>, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// Enhance `image`. Throttling ends in a fallback image; other failures are returned.
    #[tracing::instrument(skip_all, fields(enhancement = ?params.enhancement, theme = ?params.theme))]
    pub async fn run(
        &self,
        image: &[u8],
        mime_type: &str,
        params: &StyleParams,
    ) -> Result<EnhancementOutcome, ClassifiedError> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let error = match generate_with_deadline(&self.generator, image, mime_type, params)
                .await
            {
                Ok(generated) => {
                    return Ok(EnhancementOutcome {
                        image: generated,
                        fallback: None,
                        attempts: attempt,
                    })
                }
                Err(error) => error,
            };

            tracing::warn!(
                attempt,
                kind = %error.kind,
                retry_after = ?error.retry_after_secs,
                quota_zero = error.quota_zero,
                "Enhancement attempt failed"
            );

            if error.quota_zero {
                return self.fallback(image, params, error, QUOTA_ZERO_NOTE, attempt).await;
            }
            if !error.kind.is_throttling() {
                return Err(error);
            }
            if attempt >= max_attempts {
                return self
                    .fallback(image, params, error, QUOTA_EXHAUSTED_NOTE, attempt)
                    .await;
            }

            let delay = self.policy.delay(error.retry_after_secs, attempt - 1);
            tracing::info!(delay_secs = delay.as_secs(), "Retrying enhancement after backoff");
            tokio::time::sleep(delay).await;
        }
    }

    async fn fallback(
        &self,
        image: &[u8],
        params: &StyleParams,
        cause: ClassifiedError,
        note: &str,
        attempts: u32,
    ) -> Result<EnhancementOutcome, ClassifiedError> {
        let style = FallbackStyle::Enhance {
            enhancement: params.enhancement,
            theme: params.theme,
        };
        match render_fallback(image, style).await {
            Some(rendered) => Ok(EnhancementOutcome {
                image: rendered,
                fallback: Some(FallbackInfo {
                    note: note.to_string(),
                    cause,
                }),
                attempts,
            }),
            None => Err(cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{generated, ScriptedGenerator};
    use hestia_core::models::{DesignTheme, EnhancementType, ProviderErrorKind};
    use hestia_core::AppConfig;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::time::Duration;
    use tokio::time::Instant;

    fn photo() -> Vec<u8> {
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([200, 180, 160])))
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn runner(generator: &ScriptedGenerator) -> EnhancementRunner {
        EnhancementRunner::new(
            Arc::new(generator.clone()),
            RetryPolicy::enhancement(&AppConfig::default().retry),
        )
    }

    fn params() -> StyleParams {
        StyleParams::enhancement(EnhancementType::Professional)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_is_returned() {
        let generator = ScriptedGenerator::with_outcomes([Ok(generated(4))]);
        let outcome = runner(&generator)
            .run(&photo(), "image/png", &params())
            .await
            .unwrap();
        assert_eq!(outcome.image, generated(4));
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.fallback.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_hint_sets_the_delay() {
        let throttled = ClassifiedError::new(ProviderErrorKind::QuotaExceeded, "quota")
            .with_retry_after(Some(2));
        let generator = ScriptedGenerator::with_outcomes([Err(throttled), Ok(generated(5))]);
        let start = Instant::now();

        let outcome = runner(&generator)
            .run(&photo(), "image/png", &params())
            .await
            .unwrap();

        assert_eq!(outcome.attempts, 2);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_throttling_falls_back_after_doubling_delays() {
        let throttled = || ClassifiedError::new(ProviderErrorKind::RateLimit, "busy");
        let generator =
            ScriptedGenerator::with_outcomes([Err(throttled()), Err(throttled()), Err(throttled())]);
        let start = Instant::now();

        let outcome = runner(&generator)
            .run(&photo(), "image/png", &params())
            .await
            .unwrap();

        assert_eq!(generator.call_count(), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(90) && elapsed < Duration::from_secs(91));
        assert_eq!(outcome.image.mime_type, "image/jpeg");
        assert_eq!(outcome.fallback.unwrap().note, QUOTA_EXHAUSTED_NOTE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_zero_skips_retries() {
        let zero = ClassifiedError::new(ProviderErrorKind::QuotaExceeded, "quota")
            .with_retry_after(Some(60))
            .with_quota_zero(true);
        let generator = ScriptedGenerator::with_outcomes([Err(zero)]);
        let params = params();
        let params = StyleParams {
            theme: Some(DesignTheme::Vintage),
            ..params
        };

        let outcome = runner(&generator)
            .run(&photo(), "image/png", &params)
            .await
            .unwrap();

        assert_eq!(generator.call_count(), 1);
        let info = outcome.fallback.unwrap();
        assert_eq!(info.note, QUOTA_ZERO_NOTE);
        assert!(info.cause.quota_zero);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_surfaced() {
        let generator =
            ScriptedGenerator::with_outcomes([Err(ClassifiedError::unknown("model crashed"))]);
        let err = runner(&generator)
            .run(&photo(), "image/png", &params())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Unknown);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_source_returns_the_cause() {
        let zero = ClassifiedError::new(ProviderErrorKind::QuotaExceeded, "quota").with_quota_zero(true);
        let generator = ScriptedGenerator::with_outcomes([Err(zero)]);
        let err = runner(&generator)
            .run(b"garbage", "image/png", &params())
            .await
            .unwrap_err();
        assert!(err.quota_zero);
    }
}
