//! Provider error classification.
//!
//! The generator reports throttling only through free text (and sometimes the HTTP status),
//! so the markers below decide whether a failure can be waited out.

use hestia_core::models::{ClassifiedError, ProviderErrorKind};
use regex::Regex;
use std::sync::LazyLock;

pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "Google AI quota exceeded. Please try again in a few minutes or upgrade your plan.";
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please wait a moment before trying again.";
pub const QUOTA_STATUS_MESSAGE: &str =
    "Google AI service is temporarily unavailable due to quota limits. Please try again later.";

const QUOTA_DEFAULT_RETRY_SECS: u64 = 60;
const RATE_LIMIT_DEFAULT_RETRY_SECS: u64 = 30;
const STATUS_429_DEFAULT_RETRY_SECS: u64 = 120;

static RETRY_DELAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""retryDelay"\s*:\s*"(\d+)s""#).expect("valid retryDelay pattern"));
static RETRY_IN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)retry in\s+([\d.]+)s").expect("valid retry-in pattern"));
static QUOTA_ZERO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"limit:\s*0").expect("valid quota-zero pattern"));

/// Extract the provider's retry hint in whole seconds, rounding fractions up.
pub fn parse_retry_after(message: &str) -> Option<u64> {
    if let Some(secs) = RETRY_DELAY_RE
        .captures(message)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
    {
        return Some(secs);
    }

    RETRY_IN_RE
        .captures(message)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| secs.ceil() as u64)
}

pub fn is_quota_zero(message: &str) -> bool {
    QUOTA_ZERO_RE.is_match(message)
}

/// Classify a failed generation from the provider's error text and optional HTTP status.
pub fn classify_error_text(message: &str, http_status: Option<u16>) -> ClassifiedError {
    let lower = message.to_lowercase();
    let retry_hint = parse_retry_after(message);
    let quota_zero = is_quota_zero(message);

    if quota_zero
        || lower.contains("quota")
        || lower.contains("rate limit")
        || lower.contains("429")
    {
        return ClassifiedError::new(ProviderErrorKind::QuotaExceeded, QUOTA_EXCEEDED_MESSAGE)
            .with_retry_after(Some(retry_hint.unwrap_or(QUOTA_DEFAULT_RETRY_SECS)))
            .with_quota_zero(quota_zero);
    }

    if lower.contains("too many requests") {
        return ClassifiedError::new(ProviderErrorKind::RateLimit, RATE_LIMIT_MESSAGE)
            .with_retry_after(Some(retry_hint.unwrap_or(RATE_LIMIT_DEFAULT_RETRY_SECS)));
    }

    match http_status {
        Some(429) => ClassifiedError::new(ProviderErrorKind::QuotaExceeded, QUOTA_STATUS_MESSAGE)
            .with_retry_after(Some(retry_hint.unwrap_or(STATUS_429_DEFAULT_RETRY_SECS))),
        Some(400 | 401 | 403) => ClassifiedError::api_error(message),
        _ if lower.contains("api key") || lower.contains("api_key") => {
            ClassifiedError::api_error(message)
        }
        _ => ClassifiedError::unknown(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_field_is_extracted() {
        let body = r#"{"error":{"code":429,"details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay": "45s"}]}}"#;
        let err = classify_error_text(body, Some(429));
        assert_eq!(err.kind, ProviderErrorKind::QuotaExceeded);
        assert_eq!(err.retry_after_secs, Some(45));
        assert!(!err.quota_zero);
    }

    #[test]
    fn test_retry_in_rounds_up() {
        assert_eq!(parse_retry_after("Please retry in 12.2s."), Some(13));
        assert_eq!(parse_retry_after("nothing here"), None);
    }

    #[test]
    fn test_limit_zero_always_sets_quota_zero() {
        let err = classify_error_text(
            "Quota exceeded for metric generate_content_free_tier_requests, limit: 0",
            None,
        );
        assert!(err.quota_zero);
        assert_eq!(err.kind, ProviderErrorKind::QuotaExceeded);
        assert!(!err.is_retryable());

        let err = classify_error_text("model overloaded, limit: 0", Some(503));
        assert!(err.quota_zero);

        let err = classify_error_text(
            "Quota exceeded for metric generate_content_free_tier_requests, limit: 05",
            None,
        );
        assert!(err.quota_zero);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_quota_defaults_to_sixty_seconds() {
        let err = classify_error_text("You exceeded your current quota", None);
        assert_eq!(err.retry_after_secs, Some(60));
        assert_eq!(err.message, QUOTA_EXCEEDED_MESSAGE);
    }

    #[test]
    fn test_too_many_requests_is_rate_limit() {
        let err = classify_error_text("Too Many Requests", None);
        assert_eq!(err.kind, ProviderErrorKind::RateLimit);
        assert_eq!(err.retry_after_secs, Some(30));

        let err = classify_error_text("Too many requests, retry in 4s", None);
        assert_eq!(err.retry_after_secs, Some(4));
    }

    #[test]
    fn test_bare_429_status() {
        let err = classify_error_text("RESOURCE_EXHAUSTED", Some(429));
        assert_eq!(err.kind, ProviderErrorKind::QuotaExceeded);
        assert_eq!(err.retry_after_secs, Some(120));
        assert_eq!(err.message, QUOTA_STATUS_MESSAGE);
    }

    #[test]
    fn test_other_failures_are_not_retryable() {
        let err = classify_error_text("API key not valid", Some(400));
        assert_eq!(err.kind, ProviderErrorKind::ApiError);
        assert_eq!(err.message, "API key not valid");

        let err = classify_error_text("connection reset by peer", None);
        assert_eq!(err.kind, ProviderErrorKind::Unknown);
        assert!(!err.is_retryable());
    }
}
