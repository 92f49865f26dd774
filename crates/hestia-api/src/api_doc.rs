//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use hestia_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hestia API",
        version = "0.1.0",
        description = "Real-estate workspace API: AI room redesign and photo enhancement, social publishing, credit purchases, visit scheduling and dashboard metrics. Protected endpoints expect a session token as a Bearer header or session cookie."
    ),
    paths(
        handlers::redesign::redesign_room,
        handlers::enhance::enhance_image,
        handlers::social::generate_caption,
        handlers::social::publish_post,
        handlers::social::plan_slideshow,
        handlers::payments::create_charge,
        handlers::uploads::upload_image,
        handlers::uploads::upload_video,
        handlers::tts::synthesize_speech,
        handlers::metrics::dashboard_metrics,
        handlers::visits::schedule_visit,
    ),
    components(
        schemas(
            models::RoomType,
            models::DesignTheme,
            models::Intensity,
            models::QualityProfile,
            models::EnhancementType,
            models::ProviderErrorKind,
            models::Platform,
            models::ScheduleStatus,
            models::SocialSchedule,
            models::UploadResult,
            models::CaptionLocale,
            models::Payment,
            models::PaymentStatus,
            models::DashboardMetrics,
            models::TrendPoint,
            models::LabeledValue,
            models::VisitRequest,
            handlers::redesign::RedesignRoomRequest,
            handlers::redesign::RedesignRoomResponse,
            handlers::redesign::ThemeResultBody,
            handlers::enhance::EnhanceImageRequest,
            handlers::enhance::EnhanceImageResponse,
            handlers::social::CaptionRequest,
            handlers::social::CaptionResponse,
            handlers::social::PublishRequest,
            handlers::social::PublishResponse,
            handlers::social::SlideshowRequest,
            handlers::social::SlideshowResponse,
            handlers::payments::ChargeBody,
            handlers::payments::ChargeCreatedResponse,
            handlers::uploads::DataUrlUpload,
            handlers::uploads::UploadResponse,
            handlers::tts::SpeechRequest,
            handlers::tts::SpeechResponse,
            handlers::tts::SpeechFailure,
            handlers::visits::VisitScheduledResponse,
            error::ErrorResponse,
            hestia_infra::GenerationErrorResponse,
        )
    ),
    tags(
        (name = "generation", description = "AI room redesign and photo enhancement; each call spends one credit"),
        (name = "social", description = "Captions, publishing and slideshow planning"),
        (name = "payments", description = "Credit purchases"),
        (name = "uploads", description = "Data URL uploads to object storage"),
        (name = "speech", description = "Text-to-speech"),
        (name = "dashboard", description = "Agency income metrics"),
        (name = "visits", description = "Property visit scheduling")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_endpoint() {
        let spec = get_openapi_spec();
        for path in [
            "/api/redesign-room",
            "/api/enhance-image",
            "/api/social/caption",
            "/api/social/publish",
            "/api/social/video",
            "/api/payments/charge",
            "/api/upload-image",
            "/api/upload-video",
            "/api/tts",
            "/api/dashboard/metrics",
            "/api/visits",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
