use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;

impl From<ProcessingError> for hestia_core::AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Encode(msg) => hestia_core::AppError::Internal(msg),
            other => hestia_core::AppError::ImageProcessing(other.to_string()),
        }
    }
}
