//! Wire repositories and provider clients into [`AppState`].

use crate::state::{AppState, GateState};
use anyhow::Result;
use hestia_core::Config;
use hestia_db::{SessionRepository, UserRepository};
use hestia_providers::{GeminiClient, ImageGenerator};
use hestia_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let gates = GateState {
        sessions: Arc::new(SessionRepository::new(pool.clone())),
        credits: Arc::new(UserRepository::new(pool.clone())),
    };

    let providers = config.providers();
    if providers.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; generation requests will fail");
    }
    let generator: Arc<dyn ImageGenerator> = Arc::new(GeminiClient::new(providers)?);

    let state = AppState::new(config.clone(), pool, storage, generator, gates)?;

    tracing::info!(
        redesign_max_retries = config.retry().redesign_max_retries,
        enhance_max_attempts = config.retry().enhance_max_attempts,
        upload_post_configured = state.integrations.upload_post.is_configured(),
        "Services initialized"
    );

    Ok(Arc::new(state))
}
