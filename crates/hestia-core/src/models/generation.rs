//! Image generation vocabulary: room types, themes, quality profiles and the
//! structured provider error returned by every generation attempt.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    LivingRoom,
    Bedroom,
    Kitchen,
    Bathroom,
    DiningRoom,
    Office,
    Outdoor,
    #[default]
    Other,
}

impl RoomType {
    /// Human-readable label used inside prompts
    pub fn label(self) -> &'static str {
        match self {
            RoomType::LivingRoom => "living room",
            RoomType::Bedroom => "bedroom",
            RoomType::Kitchen => "kitchen",
            RoomType::Bathroom => "bathroom",
            RoomType::DiningRoom => "dining room",
            RoomType::Office => "home office",
            RoomType::Outdoor => "outdoor space",
            RoomType::Other => "room",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DesignTheme {
    Modern,
    Minimalist,
    Industrial,
    Scandinavian,
    Traditional,
    Bohemian,
    Rustic,
    Coastal,
    Vintage,
    Luxury,
}

impl DesignTheme {
    pub const ALL: [DesignTheme; 10] = [
        DesignTheme::Modern,
        DesignTheme::Minimalist,
        DesignTheme::Industrial,
        DesignTheme::Scandinavian,
        DesignTheme::Traditional,
        DesignTheme::Bohemian,
        DesignTheme::Rustic,
        DesignTheme::Coastal,
        DesignTheme::Vintage,
        DesignTheme::Luxury,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DesignTheme::Modern => "modern",
            DesignTheme::Minimalist => "minimalist",
            DesignTheme::Industrial => "industrial",
            DesignTheme::Scandinavian => "scandinavian",
            DesignTheme::Traditional => "traditional",
            DesignTheme::Bohemian => "bohemian",
            DesignTheme::Rustic => "rustic",
            DesignTheme::Coastal => "coastal",
            DesignTheme::Vintage => "vintage",
            DesignTheme::Luxury => "luxury",
        }
    }
}

impl Display for DesignTheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Subtle,
    #[default]
    Balanced,
    Bold,
}

impl Intensity {
    pub fn as_str(self) -> &'static str {
        match self {
            Intensity::Subtle => "subtle",
            Intensity::Balanced => "balanced",
            Intensity::Bold => "bold",
        }
    }
}

/// Quality profile: selects the model variant, the upload downscale bound and the per-attempt timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QualityProfile {
    Fast,
    #[default]
    Balanced,
    Hq,
    Ultra,
}

impl QualityProfile {
    /// Longest edge allowed before dispatch; `None` sends the image untouched.
    pub fn max_dimension(self) -> Option<u32> {
        match self {
            QualityProfile::Fast => Some(900),
            QualityProfile::Balanced => Some(1080),
            QualityProfile::Hq => Some(1400),
            QualityProfile::Ultra => None,
        }
    }

    /// JPEG quality used when a downscaled copy has to be re-encoded.
    pub fn jpeg_quality(self) -> u8 {
        match self {
            QualityProfile::Fast => 80,
            QualityProfile::Balanced => 85,
            QualityProfile::Hq | QualityProfile::Ultra => 90,
        }
    }

    pub fn attempt_timeout(self) -> Duration {
        match self {
            QualityProfile::Fast => Duration::from_secs(25),
            QualityProfile::Balanced => Duration::from_secs(45),
            QualityProfile::Hq => Duration::from_secs(60),
            QualityProfile::Ultra => Duration::from_secs(90),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementType {
    #[default]
    Professional,
    Brightness,
    Contrast,
    Color,
}

/// Parameters that select the prompt and the model for one generation call.
///
/// A theme switches the call from plain enhancement to a room redesign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleParams {
    pub enhancement: EnhancementType,
    pub room: RoomType,
    pub theme: Option<DesignTheme>,
    pub intensity: Option<Intensity>,
    pub quality: Option<QualityProfile>,
    pub seed: Option<u32>,
    pub custom_prompt: Option<String>,
}

impl StyleParams {
    pub fn enhancement(enhancement: EnhancementType) -> Self {
        Self {
            enhancement,
            ..Default::default()
        }
    }

    pub fn redesign(room: RoomType, theme: DesignTheme, intensity: Intensity) -> Self {
        Self {
            room,
            theme: Some(theme),
            intensity: Some(intensity),
            ..Default::default()
        }
    }

    pub fn is_redesign(&self) -> bool {
        self.theme.is_some()
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
        self.custom_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }
}

/// Raw bytes returned by the generator (or the local fallback renderer).
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl std::fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeneratedImage")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    QuotaExceeded,
    RateLimit,
    ApiError,
    Unknown,
}

impl ProviderErrorKind {
    /// Quota and rate-limit failures can be waited out; everything else is surfaced.
    pub fn is_throttling(self) -> bool {
        matches!(
            self,
            ProviderErrorKind::QuotaExceeded | ProviderErrorKind::RateLimit
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderErrorKind::QuotaExceeded => "quota_exceeded",
            ProviderErrorKind::RateLimit => "rate_limit",
            ProviderErrorKind::ApiError => "api_error",
            ProviderErrorKind::Unknown => "unknown",
        }
    }
}

impl Display for ProviderErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Structured failure of a single generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClassifiedError {
    pub message: String,
    pub kind: ProviderErrorKind,
    pub retry_after_secs: Option<u64>,
    /// The caller's allotment is permanently zero; retrying is futile.
    pub quota_zero: bool,
}

impl ClassifiedError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            retry_after_secs: None,
            quota_zero: false,
        }
    }

    pub fn api_error(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::ApiError, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unknown, message)
    }

    pub fn with_retry_after(mut self, seconds: Option<u64>) -> Self {
        self.retry_after_secs = seconds;
        self
    }

    pub fn with_quota_zero(mut self, quota_zero: bool) -> Self {
        self.quota_zero = quota_zero;
        self
    }

    /// Whether waiting and trying again can succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_throttling() && !self.quota_zero
    }
}
