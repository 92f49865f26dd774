//! Hestia Infrastructure Library
//!
//! Shared plumbing for the HTTP server:
//! - Middleware (request ID, security headers)
//! - Telemetry initialization
//! - Error response body

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

#[cfg(feature = "middleware")]
pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
    REQUEST_ID_HEADER,
};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};

pub use error::{ErrorResponse, GenerationErrorResponse};
