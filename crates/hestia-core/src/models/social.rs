use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    Linkedin,
    X,
    Tiktok,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::X => "x",
            Platform::Tiktok => "tiktok",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Scheduled,
    Published,
    Failed,
}

impl ScheduleStatus {
    /// A post is only marked published when it goes out now without a schedule date.
    pub fn for_request(scheduled_at: Option<DateTime<Utc>>, publish_now: bool) -> Self {
        if scheduled_at.is_some() || !publish_now {
            ScheduleStatus::Scheduled
        } else {
            ScheduleStatus::Published
        }
    }

    pub fn log_message(self) -> &'static str {
        match self {
            ScheduleStatus::Published => "Published",
            ScheduleStatus::Scheduled => "Scheduled",
            ScheduleStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum LogLevelTag {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
    pub id: Uuid,
    pub user_id: String,
    pub content_text: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SocialSchedule {
    pub id: Uuid,
    pub user_id: String,
    pub post_id: Uuid,
    pub platform: Platform,
    pub scheduled_at: DateTime<Utc>,
    pub status: ScheduleStatus,
    pub publish_result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to persist a post and one schedule row per platform.
#[derive(Debug, Clone)]
pub struct NewSocialPost {
    pub user_id: String,
    pub content_text: String,
    pub media_url: Option<String>,
    pub platforms: Vec<Platform>,
    pub scheduled_at: DateTime<Utc>,
    pub status: ScheduleStatus,
}

/// Per-platform outcome of an immediate publish through the publishing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResult {
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Language of a generated caption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaptionLocale {
    #[default]
    En,
    Fr,
}
