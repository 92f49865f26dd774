//! Multi-theme redesign queue.
//!
//! Themes are pulled one at a time by a single worker loop, so exactly one generator call is
//! in flight per request. A throttled theme may be retried once: it sleeps for the backoff
//! and goes to the back of the queue. A zero-quota failure fails the rest of the batch without
//! further calls. A theme that stays throttled is answered with a locally rendered fallback.

use crate::attempt::{generate_with_deadline, render_fallback};
use crate::policy::RetryPolicy;
use crate::state::{ThemeState, ThemeStates};
use hestia_core::models::{
    ClassifiedError, DesignTheme, FallbackInfo, ProviderErrorKind, RedesignRequest, RedesignSummary,
    ThemeAttempt, ThemeResult,
};
use hestia_processing::FallbackStyle;
use hestia_providers::ImageGenerator;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

pub const REDESIGN_FALLBACK_NOTE: &str =
    "Google AI quota exceeded. Displaying a locally styled preview.";

/// Upper bound of the random base seed when the caller does not pick one
const RANDOM_SEED_RANGE: u32 = 1_000_000;

#[derive(Clone)]
pub struct RedesignOrchestrator {
    generator: Arc<dyn ImageGenerator>,
    policy: RetryPolicy,
}

impl RedesignOrchestrator {
    pub fn new(generator: Arc<dyn ImageGenerator>, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    #[tracing::instrument(skip_all, fields(themes = request.themes().len(), quality = ?request.quality))]
    pub async fn run(&self, request: &RedesignRequest) -> RedesignSummary {
        let base_seed = request
            .seed
            .unwrap_or_else(|| rand::random_range(0..RANDOM_SEED_RANGE));

        let mut states = ThemeStates::queued(request.themes());
        let mut queue: VecDeque<ThemeAttempt> =
            request.themes().iter().copied().map(ThemeAttempt::new).collect();
        let mut results: Vec<ThemeResult> = Vec::with_capacity(queue.len());

        while let Some(mut attempt) = queue.pop_front() {
            let theme = attempt.theme;
            states.transition(theme, ThemeState::InFlight);

            let seed = base_seed.wrapping_add(results.len() as u32);
            let params = request.style_for(theme, Some(seed));
            attempt.attempt_count += 1;

            let error = match generate_with_deadline(
                &self.generator,
                &request.image,
                &request.mime_type,
                &params,
            )
            .await
            {
                Ok(image) => {
                    tracing::info!(theme = %theme, attempts = attempt.attempt_count, "Theme redesigned");
                    states.transition(theme, ThemeState::Succeeded);
                    results.push(ThemeResult::Success {
                        theme,
                        image,
                        fallback: None,
                    });
                    continue;
                }
                Err(error) => error,
            };

            attempt.record_failure(&error);
            tracing::warn!(
                theme = %theme,
                attempt = attempt.attempt_count,
                kind = %error.kind,
                retry_after = ?error.retry_after_secs,
                quota_zero = error.quota_zero,
                "Theme attempt failed"
            );

            let retries_used = attempt.attempt_count - 1;
            if error.is_retryable() && retries_used < self.policy.max_retries {
                let delay = self.policy.delay(attempt.last_retry_after, retries_used);
                states.transition(theme, ThemeState::Retrying);
                tracing::info!(theme = %theme, delay_secs = delay.as_secs(), "Retrying theme after backoff");
                tokio::time::sleep(delay).await;
                queue.push_back(attempt);
                continue;
            }

            if error.quota_zero {
                let preview = render_fallback(&request.image, FallbackStyle::Redesign(theme)).await;
                states.transition(theme, ThemeState::Failed);
                results.push(ThemeResult::Failure {
                    theme,
                    error: error.clone(),
                    fallback: preview,
                });

                for remaining in queue.drain(..) {
                    let preview =
                        render_fallback(&request.image, FallbackStyle::Redesign(remaining.theme))
                            .await;
                    states.transition(remaining.theme, ThemeState::Failed);
                    results.push(ThemeResult::Failure {
                        theme: remaining.theme,
                        error: error.clone(),
                        fallback: preview,
                    });
                }
                tracing::warn!("Generator quota is zero; remaining themes failed without calls");
                break;
            }

            if error.kind.is_throttling() {
                results.push(self.fallback_result(request, theme, error.clone()).await);
                states.transition(theme, ThemeState::Failed);

                if error.kind == ProviderErrorKind::RateLimit && !queue.is_empty() {
                    if let Some(secs) = error.retry_after_secs {
                        let pause = Duration::from_secs(secs).min(self.policy.max_backoff);
                        tracing::info!(pause_secs = pause.as_secs(), "Pausing before next theme");
                        tokio::time::sleep(pause).await;
                    }
                }
                continue;
            }

            states.transition(theme, ThemeState::Failed);
            results.push(ThemeResult::Failure {
                theme,
                error,
                fallback: None,
            });
        }

        debug_assert!(states.all_terminal(), "redesign batch left a theme unresolved");

        let summary = RedesignSummary { results };
        tracing::info!(
            success = summary.success(),
            failed = summary.failed_count(),
            "Redesign batch finished"
        );
        summary
    }

    async fn fallback_result(
        &self,
        request: &RedesignRequest,
        theme: DesignTheme,
        cause: ClassifiedError,
    ) -> ThemeResult {
        match render_fallback(&request.image, FallbackStyle::Redesign(theme)).await {
            Some(image) => ThemeResult::Success {
                theme,
                image,
                fallback: Some(FallbackInfo {
                    note: REDESIGN_FALLBACK_NOTE.to_string(),
                    cause,
                }),
            },
            None => ThemeResult::Failure {
                theme,
                error: cause,
                fallback: None,
            },
        }
    }
}
