use anyhow::Result;
use hestia_core::Config;
use hestia_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config.storage()).await?;
    tracing::info!(backend = ?storage.backend_type(), "Storage initialized");
    Ok(storage)
}
