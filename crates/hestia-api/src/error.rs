//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that converts into
//! `AppError` can be propagated with `?` and renders with the same status, body and logging.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hestia_core::models::ClassifiedError;
use hestia_core::{AppError, ErrorMetadata, LogLevel};
use hestia_infra::GenerationErrorResponse;
use hestia_providers::ProviderError;
use serde::de::DeserializeOwned;

pub use hestia_infra::ErrorResponse;

/// Wrapper type for AppError to implement IntoResponse
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<hestia_storage::StorageError> for HttpAppError {
    fn from(err: hestia_storage::StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<hestia_processing::ProcessingError> for HttpAppError {
    fn from(err: hestia_processing::ProcessingError) -> Self {
        HttpAppError(err.into())
    }
}

/// Map a publishing/payment/speech failure to a request error attributed to `service`.
pub fn provider_error(service: &str, err: ProviderError) -> HttpAppError {
    match err {
        ProviderError::MissingKey(var) => {
            HttpAppError(AppError::Internal(format!("Missing {}", var)))
        }
        ProviderError::InvalidRequest(msg) => HttpAppError(AppError::InvalidInput(msg)),
        ProviderError::Rejected { message, .. } => HttpAppError(AppError::upstream(service, message)),
        ProviderError::Transport(source) => HttpAppError(AppError::InternalWithSource {
            message: format!("{} request failed", service),
            source,
        }),
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that answers malformed bodies with a 400 `ErrorResponse`.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let show_details = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };

        (status, Json(body)).into_response()
    }
}

/// 502 carrying the provider's classification, for generation failures that have no
/// fallback.
pub fn generation_failure(error: &ClassifiedError) -> Response {
    tracing::warn!(kind = %error.kind, error = %error.message, "Image generation failed");
    (
        StatusCode::BAD_GATEWAY,
        Json(GenerationErrorResponse::from(error)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_mapping() {
        let err = provider_error(
            "payments",
            ProviderError::Rejected {
                status: 400,
                message: "Card declined".to_string(),
            },
        );
        assert!(matches!(err.0, AppError::Upstream { ref message, .. } if message == "Card declined"));
        assert_eq!(err.0.http_status_code(), 502);

        let err = provider_error("speech", ProviderError::MissingKey("OPENAI_API_KEY"));
        assert_eq!(err.0.http_status_code(), 500);

        let err = provider_error(
            "upload-post",
            ProviderError::InvalidRequest("videoUrl is required".to_string()),
        );
        assert_eq!(err.0.http_status_code(), 400);
    }

    #[test]
    fn test_sensitive_error_hides_details() {
        let response =
            HttpAppError(AppError::Internal("secret connection string".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
