use crate::state::AppState;
use anyhow::{Context, Result};
use mediaguard_core::Config;
use mediaguard_services::{EventDispatcher, Storage};
use std::sync::Arc;

/// Build the moderation dispatcher and wrap everything handlers need.
pub fn initialize_services(config: &Config, storage: Arc<dyn Storage>) -> Result<Arc<AppState>> {
    let dispatcher = EventDispatcher::from_config(config, storage.clone())
        .context("Failed to initialize moderation services")?;

    tracing::info!(
        scratch_dir = %config.scratch_dir().display(),
        signed_url_ttl_secs = config.signed_url_ttl().as_secs(),
        "Moderation services initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        storage,
        dispatcher,
    }))
}
