//! Multi-theme redesign job: the request, the per-theme attempt state and the outcomes.

use crate::error::AppError;
use crate::models::generation::{
    ClassifiedError, DesignTheme, GeneratedImage, Intensity, ProviderErrorKind, QualityProfile,
    RoomType, StyleParams,
};

/// Upper bound on themes per request; extra themes are dropped, never rejected.
pub const MAX_THEMES: usize = 4;

#[derive(Debug, Clone)]
pub struct RedesignRequest {
    pub image: Vec<u8>,
    pub mime_type: String,
    pub room: RoomType,
    themes: Vec<DesignTheme>,
    pub intensity: Intensity,
    pub quality: Option<QualityProfile>,
    /// Base variation seed; each attempt offsets it by the number of results so far.
    pub seed: Option<u32>,
    pub custom_prompt: Option<String>,
}

impl RedesignRequest {
    /// Build a request from the first [`MAX_THEMES`] distinct themes, in request order.
    /// An empty theme list is rejected.
    pub fn new(
        image: Vec<u8>,
        mime_type: impl Into<String>,
        requested: Vec<DesignTheme>,
    ) -> Result<Self, AppError> {
        if requested.is_empty() {
            return Err(AppError::InvalidInput(
                "Provide 1-4 design themes".to_string(),
            ));
        }

        let mut themes = Vec::with_capacity(MAX_THEMES);
        for theme in requested {
            if themes.len() == MAX_THEMES {
                break;
            }
            if !themes.contains(&theme) {
                themes.push(theme);
            }
        }

        Ok(Self {
            image,
            mime_type: mime_type.into(),
            room: RoomType::default(),
            themes,
            intensity: Intensity::default(),
            quality: None,
            seed: None,
            custom_prompt: None,
        })
    }

    pub fn with_room(mut self, room: RoomType) -> Self {
        self.room = room;
        self
    }

    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_quality(mut self, quality: Option<QualityProfile>) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_seed(mut self, seed: Option<u32>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_custom_prompt(mut self, prompt: Option<String>) -> Self {
        self.custom_prompt = prompt;
        self
    }

    pub fn themes(&self) -> &[DesignTheme] {
        &self.themes
    }

    /// Prompt parameters for one attempt at `theme`.
    pub fn style_for(&self, theme: DesignTheme, seed: Option<u32>) -> StyleParams {
        StyleParams::redesign(self.room, theme, self.intensity)
            .with_quality(self.quality)
            .with_seed(seed)
            .with_custom_prompt(self.custom_prompt.clone())
    }
}

/// Mutable per-theme bookkeeping owned by the orchestrator for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeAttempt {
    pub theme: DesignTheme,
    pub attempt_count: u32,
    pub last_error: Option<String>,
    pub last_retry_after: Option<u64>,
}

impl ThemeAttempt {
    pub fn new(theme: DesignTheme) -> Self {
        Self {
            theme,
            attempt_count: 0,
            last_error: None,
            last_retry_after: None,
        }
    }

    pub fn record_failure(&mut self, error: &ClassifiedError) {
        self.last_error = Some(error.message.clone());
        self.last_retry_after = error.retry_after_secs;
    }
}

/// Why a locally rendered image stands in for a generated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackInfo {
    pub note: String,
    pub cause: ClassifiedError,
}

/// Resolved outcome for one theme.
#[derive(Debug, Clone)]
pub enum ThemeResult {
    Success {
        theme: DesignTheme,
        image: GeneratedImage,
        /// Set when the image is a local approximation
        fallback: Option<FallbackInfo>,
    },
    Failure {
        theme: DesignTheme,
        error: ClassifiedError,
        /// Preview rendered locally so the caller still has something to show
        fallback: Option<GeneratedImage>,
    },
}

impl ThemeResult {
    pub fn theme(&self) -> DesignTheme {
        match self {
            ThemeResult::Success { theme, .. } | ThemeResult::Failure { theme, .. } => *theme,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ThemeResult::Success { .. })
    }

    pub fn error(&self) -> Option<&ClassifiedError> {
        match self {
            ThemeResult::Failure { error, .. } => Some(error),
            ThemeResult::Success { .. } => None,
        }
    }

    /// The provider failure behind this result, including one papered over by a fallback.
    pub fn cause(&self) -> Option<&ClassifiedError> {
        match self {
            ThemeResult::Failure { error, .. } => Some(error),
            ThemeResult::Success { fallback, .. } => fallback.as_ref().map(|f| &f.cause),
        }
    }
}

/// Results of a redesign batch in completion order.
#[derive(Debug, Clone, Default)]
pub struct RedesignSummary {
    pub results: Vec<ThemeResult>,
}

impl RedesignSummary {
    pub fn success(&self) -> bool {
        self.results.iter().any(ThemeResult::is_success)
    }

    /// First quota or rate-limit failure, fallbacks included; its fields are echoed at the
    /// top level of the response.
    pub fn throttling_issue(&self) -> Option<&ClassifiedError> {
        self.results
            .iter()
            .filter_map(ThemeResult::cause)
            .find(|e| e.kind.is_throttling())
    }

    pub fn result_for(&self, theme: DesignTheme) -> Option<&ThemeResult> {
        self.results.iter().find(|r| r.theme() == theme)
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }

    pub fn kinds(&self) -> Vec<Option<ProviderErrorKind>> {
        self.results
            .iter()
            .map(|r| r.error().map(|e| e.kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_themes_rejected() {
        let err = RedesignRequest::new(vec![1, 2, 3], "image/png", vec![]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref msg) if msg == "Provide 1-4 design themes"));
    }

    #[test]
    fn test_themes_truncated_to_four() {
        let themes = DesignTheme::ALL[..6].to_vec();
        let request = RedesignRequest::new(vec![0], "image/jpeg", themes).unwrap();
        assert_eq!(request.themes(), &DesignTheme::ALL[..4]);
    }

    #[test]
    fn test_duplicate_themes_collapse_in_order() {
        use DesignTheme::*;
        let request = RedesignRequest::new(
            vec![0],
            "image/jpeg",
            vec![Modern, Modern, Rustic, Modern, Coastal, Rustic, Luxury, Vintage],
        )
        .unwrap();
        assert_eq!(request.themes(), &[Modern, Rustic, Coastal, Luxury]);
    }

    #[test]
    fn test_style_for_carries_request_settings() {
        let request = RedesignRequest::new(vec![0], "image/jpeg", vec![DesignTheme::Coastal])
            .unwrap()
            .with_room(RoomType::Kitchen)
            .with_intensity(Intensity::Subtle)
            .with_quality(Some(QualityProfile::Ultra));
        let style = request.style_for(DesignTheme::Coastal, Some(42));
        assert_eq!(style.room, RoomType::Kitchen);
        assert_eq!(style.theme, Some(DesignTheme::Coastal));
        assert_eq!(style.intensity, Some(Intensity::Subtle));
        assert_eq!(style.quality, Some(QualityProfile::Ultra));
        assert_eq!(style.seed, Some(42));
    }

    #[test]
    fn test_summary_throttling_issue_picks_first_quota_or_rate_failure() {
        let image = GeneratedImage {
            bytes: vec![1],
            mime_type: "image/png".to_string(),
        };
        let summary = RedesignSummary {
            results: vec![
                ThemeResult::Failure {
                    theme: DesignTheme::Modern,
                    error: ClassifiedError::api_error("bad key"),
                    fallback: None,
                },
                ThemeResult::Success {
                    theme: DesignTheme::Rustic,
                    image,
                    fallback: None,
                },
                ThemeResult::Failure {
                    theme: DesignTheme::Luxury,
                    error: ClassifiedError::new(ProviderErrorKind::RateLimit, "slow down")
                        .with_retry_after(Some(30)),
                    fallback: None,
                },
            ],
        };

        assert!(summary.success());
        assert_eq!(summary.failed_count(), 2);
        let issue = summary.throttling_issue().unwrap();
        assert_eq!(issue.kind, ProviderErrorKind::RateLimit);
        assert_eq!(issue.retry_after_secs, Some(30));
        assert!(summary.result_for(DesignTheme::Rustic).unwrap().is_success());
    }

    #[test]
    fn test_fallback_success_still_reports_its_cause() {
        let cause = ClassifiedError::new(ProviderErrorKind::QuotaExceeded, "quota")
            .with_retry_after(Some(60));
        let summary = RedesignSummary {
            results: vec![ThemeResult::Success {
                theme: DesignTheme::Modern,
                image: GeneratedImage {
                    bytes: vec![1],
                    mime_type: "image/jpeg".to_string(),
                },
                fallback: Some(FallbackInfo {
                    note: "local".to_string(),
                    cause: cause.clone(),
                }),
            }],
        };
        assert_eq!(summary.failed_count(), 0);
        assert_eq!(summary.throttling_issue(), Some(&cause));
    }
}
