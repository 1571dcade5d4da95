use anyhow::{Context, Result};
use mediaguard_core::Config;
use mediaguard_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = config.gcs_bucket().unwrap_or("-"),
        "Storage backend initialized"
    );

    Ok(storage)
}
