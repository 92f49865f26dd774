use hestia_core::RetryConfig;
use std::time::Duration;

/// Retry budget and backoff shape for throttled generation attempts.
///
/// The delay before retry `n` (0-based) is the provider's hint when it sent one, otherwise
/// `default_backoff * 2^n`. Both are capped at `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub default_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Multi-theme batches: one retry per theme.
    pub fn redesign(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.redesign_max_retries,
            default_backoff: Duration::from_secs(config.default_delay_secs),
            max_backoff: Duration::from_secs(config.max_delay_secs),
        }
    }

    /// Single image: `enhance_max_attempts` attempts in total.
    pub fn enhancement(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.enhance_max_attempts.saturating_sub(1),
            default_backoff: Duration::from_secs(config.default_delay_secs),
            max_backoff: Duration::from_secs(config.max_delay_secs),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn delay(&self, retry_after_secs: Option<u64>, retry_index: u32) -> Duration {
        let delay = match retry_after_secs {
            Some(secs) => Duration::from_secs(secs),
            None => self
                .default_backoff
                .saturating_mul(2u32.saturating_pow(retry_index)),
        };
        delay.min(self.max_backoff)
    }
}
