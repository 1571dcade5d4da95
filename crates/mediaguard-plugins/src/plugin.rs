//! Plugin system core infrastructure
//!
//! Vendor integrations sit behind two capability traits so the moderation workflow
//! never names a vendor: a `Classifier` turns an object URI into an annotation, and a
//! `Transcoder` accepts clear videos for downstream processing.

use anyhow::Result;
use async_trait::async_trait;
use mediaguard_core::{Annotation, MediaKind};
use std::fmt::Debug;

/// Content classifier for one media type
#[async_trait]
pub trait Classifier: Send + Sync + Debug {
    /// Get the plugin name/identifier
    fn name(&self) -> &str;

    /// Media type this classifier understands
    fn kind(&self) -> MediaKind;

    /// Classify the object at `object_uri` (e.g. `gs://bucket/photos/a.jpg`).
    ///
    /// Transport and vendor errors are returned; a response that is merely missing
    /// fields yields an empty annotation, which the verdict policy treats as clear.
    async fn classify(&self, object_uri: &str) -> Result<Annotation>;
}

/// Downstream transcoding service
#[async_trait]
pub trait Transcoder: Send + Sync + Debug {
    /// Get the plugin name/identifier
    fn name(&self) -> &str;

    /// Submit a video for transcoding. Completion is not awaited.
    async fn submit(&self, request: &TranscodeRequest) -> Result<()>;
}

/// A clear video handed off to the transcoding service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeRequest {
    /// Time-limited read URL the service fetches the bytes from
    pub url: String,
    /// Display name (file stem of the object path)
    pub name: String,
    /// Bucket-relative object path
    pub path: String,
}
