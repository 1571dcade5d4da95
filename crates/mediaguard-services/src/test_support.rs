//! In-memory stand-ins for vendor plugins.

use anyhow::Result;
use async_trait::async_trait;
use mediaguard_core::{Annotation, MediaKind};
use mediaguard_plugins::{Classifier, TranscodeRequest, Transcoder};
use std::sync::Mutex;

/// Returns a fixed annotation and records every URI it was asked about.
#[derive(Debug)]
pub struct FixedClassifier {
    kind: MediaKind,
    response: std::result::Result<Annotation, String>,
    calls: Mutex<Vec<String>>,
}

impl FixedClassifier {
    pub fn returning(annotation: Annotation) -> Self {
        Self {
            kind: annotation.kind(),
            response: Ok(annotation),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(kind: MediaKind, message: &str) -> Self {
        Self {
            kind,
            response: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn kind(&self) -> MediaKind {
        self.kind
    }

    async fn classify(&self, object_uri: &str) -> Result<Annotation> {
        self.calls.lock().unwrap().push(object_uri.to_string());
        self.response.clone().map_err(|e| anyhow::anyhow!(e))
    }
}

#[derive(Debug, Default)]
pub struct RecordingTranscoder {
    fail: bool,
    requests: Mutex<Vec<TranscodeRequest>>,
}

impl RecordingTranscoder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TranscodeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for RecordingTranscoder {
    fn name(&self) -> &str {
        "recording"
    }

    async fn submit(&self, request: &TranscodeRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(anyhow::anyhow!("transcoding service returned 500"));
        }
        Ok(())
    }
}
