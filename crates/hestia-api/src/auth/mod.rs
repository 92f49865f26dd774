//! Session authentication and the credit gate.

pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, credit_middleware, extract_session_token};
pub use models::AuthUser;
