//! Overwrite a flagged upload with its placeholder.

use mediaguard_core::{AppError, Placeholder, RemediationStep};
use mediaguard_storage::{validate_key, Storage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Replaces flagged objects in place.
///
/// The placeholder is staged through a scratch file below `scratch_root`, at the same
/// relative path as the object being replaced, so concurrent remediations of different
/// objects never share a scratch file.
#[derive(Clone)]
pub struct Remediator {
    storage: Arc<dyn Storage>,
    scratch_root: PathBuf,
}

impl Remediator {
    pub fn new(storage: Arc<dyn Storage>, scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            scratch_root: scratch_root.into(),
        }
    }

    pub fn scratch_path(&self, key: &str) -> PathBuf {
        self.scratch_root.join(key)
    }

    /// Delete `key`, then write the placeholder's bytes back under the same key.
    ///
    /// The original content is gone once the first step succeeds; a failure in a later
    /// step leaves the path empty until the event is redelivered.
    #[tracing::instrument(skip(self, placeholder), fields(placeholder = %placeholder.key))]
    pub async fn remediate(&self, key: &str, placeholder: &Placeholder) -> Result<(), AppError> {
        let start = std::time::Instant::now();

        self.storage
            .delete(key)
            .await
            .map_err(|e| AppError::remediation(RemediationStep::DeleteSource, e))?;
        tracing::info!(key = %key, "Deleted flagged object");

        let scratch = self.prepare_scratch(key).await?;

        let result = self.stage_placeholder(key, placeholder, &scratch).await;
        self.cleanup_scratch(&scratch).await;
        result?;

        tracing::info!(
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Flagged object replaced with placeholder"
        );
        Ok(())
    }

    async fn prepare_scratch(&self, key: &str) -> Result<PathBuf, AppError> {
        validate_key(key).map_err(|e| AppError::remediation(RemediationStep::PrepareScratch, e))?;

        let scratch = self.scratch_path(key);
        if let Some(parent) = scratch.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::remediation(
                    RemediationStep::PrepareScratch,
                    anyhow::anyhow!("Failed to create {}: {}", parent.display(), e),
                )
            })?;
        }
        Ok(scratch)
    }

    async fn stage_placeholder(
        &self,
        key: &str,
        placeholder: &Placeholder,
        scratch: &Path,
    ) -> Result<(), AppError> {
        let bytes = self
            .storage
            .download_to_file(&placeholder.key, scratch)
            .await
            .map_err(|e| AppError::remediation(RemediationStep::FetchPlaceholder, e))?;
        tracing::debug!(
            placeholder = %placeholder.key,
            scratch = %scratch.display(),
            size_bytes = bytes,
            "Placeholder copied to scratch"
        );

        self.storage
            .upload_file(scratch, key, &placeholder.content_type)
            .await
            .map_err(|e| AppError::remediation(RemediationStep::UploadPlaceholder, e))?;

        Ok(())
    }

    async fn cleanup_scratch(&self, scratch: &Path) {
        match fs::remove_file(scratch).await {
            Ok(()) => {}
            // Nothing was staged when the placeholder download failed early
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    scratch = %scratch.display(),
                    "Failed to remove scratch file"
                );
            }
        }
    }
}
