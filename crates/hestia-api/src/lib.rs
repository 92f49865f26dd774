//! Hestia HTTP API
//!
//! Axum router, request gates and handlers. The binary in `main.rs` only loads the
//! configuration and calls [`setup::initialize_app`].

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
mod utils;

pub use state::{AppState, GateState};
