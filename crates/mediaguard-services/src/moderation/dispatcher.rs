//! Entry point for upload notifications.
//!
//! An event is validated against the trigger's media type, classified, and then either
//! remediated (flagged), passed through to transcoding (clear video) or left alone
//! (clear image). Nothing is retried here: errors are logged and returned so the
//! delivering trigger can redeliver or dead-letter the event.

use mediaguard_core::{
    AppError, Config, ErrorMetadata, LogLevel, MediaKind, Rejection, UploadEvent, Verdict,
};
use mediaguard_plugins::{
    CloudflareStreamTranscoder, GoogleVideoIntelligenceClassifier, GoogleVisionClassifier,
};
use mediaguard_storage::Storage;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::pass_through::PassThrough;
use super::remediation::Remediator;
use super::workflow::MediaProfile;

/// Terminal state of a handled event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Not an upload this trigger acts on
    Rejected(Rejection),
    /// Clear image, nothing to do
    Clear,
    /// Flagged and overwritten with the placeholder
    Remediated,
    /// Clear video handed to the transcoding service
    PassedThrough,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Outcome::Rejected(_) => f.write_str("rejected"),
            Outcome::Clear => f.write_str("clear"),
            Outcome::Remediated => f.write_str("remediated"),
            Outcome::PassedThrough => f.write_str("passed_through"),
        }
    }
}

#[derive(Clone)]
pub struct EventDispatcher {
    image: MediaProfile,
    video: MediaProfile,
    remediator: Remediator,
    pass_through: PassThrough,
}

impl EventDispatcher {
    pub fn new(
        image: MediaProfile,
        video: MediaProfile,
        remediator: Remediator,
        pass_through: PassThrough,
    ) -> Self {
        Self {
            image,
            video,
            remediator,
            pass_through,
        }
    }

    /// Wire the Google classifiers and the Cloudflare Stream transcoder from configuration.
    pub fn from_config(config: &Config, storage: Arc<dyn Storage>) -> anyhow::Result<Self> {
        let image = MediaProfile::new(
            Arc::new(GoogleVisionClassifier::from_config(config)?),
            config.placeholder(MediaKind::Image).clone(),
        );
        let video = MediaProfile::new(
            Arc::new(GoogleVideoIntelligenceClassifier::from_config(config)?),
            config.placeholder(MediaKind::Video).clone(),
        );
        let remediator = Remediator::new(storage.clone(), config.scratch_dir().clone());
        let pass_through = PassThrough::new(
            storage,
            Arc::new(CloudflareStreamTranscoder::from_config(config)?),
            config.signed_url_ttl(),
        );

        Ok(Self::new(image, video, remediator, pass_through))
    }

    fn profile(&self, kind: MediaKind) -> &MediaProfile {
        match kind {
            MediaKind::Image => &self.image,
            MediaKind::Video => &self.video,
        }
    }

    /// Handle one upload notification delivered by the `kind` trigger.
    pub async fn handle(&self, kind: MediaKind, event: &UploadEvent) -> Result<Outcome, AppError> {
        let span = tracing::info_span!(
            "moderate",
            invocation_id = %Uuid::new_v4(),
            kind = %kind,
            bucket = %event.bucket,
            key = event.name.as_deref().unwrap_or_default(),
        );

        async move {
            let start = std::time::Instant::now();
            let result = self.run(kind, event).await;

            match &result {
                Ok(outcome) => tracing::info!(
                    outcome = %outcome,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Upload event handled"
                ),
                Err(e) => match e.log_level() {
                    LogLevel::Debug => tracing::debug!(error = %e, "Upload event failed"),
                    LogLevel::Warn => tracing::warn!(error = %e, "Upload event failed"),
                    LogLevel::Error => tracing::error!(
                        error = %e,
                        code = e.error_code(),
                        recoverable = e.is_recoverable(),
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Upload event failed"
                    ),
                },
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, kind: MediaKind, event: &UploadEvent) -> Result<Outcome, AppError> {
        let upload = match event.validate(kind) {
            Ok(upload) => upload,
            Err(rejection) => {
                tracing::info!(reason = %rejection, "Upload event ignored");
                return Ok(Outcome::Rejected(rejection));
            }
        };

        let profile = self.profile(kind);
        let annotation = profile.classify(&upload).await?;

        match annotation.verdict() {
            Verdict::Flagged => {
                self.remediator
                    .remediate(&upload.key, profile.placeholder())
                    .await?;
                Ok(Outcome::Remediated)
            }
            Verdict::Clear if kind.passes_through_when_clear() => {
                self.pass_through.submit(&upload.key).await?;
                Ok(Outcome::PassedThrough)
            }
            Verdict::Clear => Ok(Outcome::Clear),
        }
    }
}
