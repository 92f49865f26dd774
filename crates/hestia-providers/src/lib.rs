//! Hestia Providers Library
//!
//! Typed clients for the third-party HTTP APIs Hestia talks to, plus the error classifier
//! that turns a provider failure into a [`hestia_core::models::ClassifiedError`].

pub mod classify;
#[cfg(any(feature = "upload-post", feature = "payments", feature = "speech"))]
pub mod error;
pub mod generator;
pub mod prompts;

#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "payments")]
pub mod payments;
#[cfg(feature = "speech")]
pub mod speech;
#[cfg(feature = "upload-post")]
pub mod upload_post;

pub use classify::classify_error_text;
#[cfg(any(feature = "upload-post", feature = "payments", feature = "speech"))]
pub use error::{ProviderError, ProviderResult};
pub use generator::ImageGenerator;

#[cfg(feature = "gemini")]
pub use gemini::GeminiClient;
#[cfg(feature = "payments")]
pub use payments::{ChargeRequest, ChargeResponse, PaymentGatewayClient};
#[cfg(feature = "speech")]
pub use speech::{SpeechClient, SynthesizedAudio};
#[cfg(feature = "upload-post")]
pub use upload_post::{UploadPostClient, UploadPostResponse};
