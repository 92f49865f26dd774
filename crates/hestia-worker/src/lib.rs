//! Hestia Worker Library
//!
//! Drives the image generator for one request at a time: the multi-theme redesign queue and
//! the single-image enhancement loop, both with throttling-aware retries and a local fallback.

mod attempt;
pub mod enhancement;
pub mod orchestrator;
pub mod policy;
pub mod state;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use enhancement::{EnhancementOutcome, EnhancementRunner};
pub use orchestrator::RedesignOrchestrator;
pub use policy::RetryPolicy;
pub use state::{ThemeState, ThemeStates};
