use mediaguard_core::{AppError, Annotation, MediaKind, Placeholder, ValidatedUpload};
use mediaguard_plugins::Classifier;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

/// Everything the workflow varies on per media type.
#[derive(Clone)]
pub struct MediaProfile {
    kind: MediaKind,
    classifier: Arc<dyn Classifier>,
    placeholder: Placeholder,
}

impl Debug for MediaProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaProfile")
            .field("kind", &self.kind)
            .field("classifier", &self.classifier.name())
            .field("placeholder", &self.placeholder.key)
            .finish()
    }
}

impl MediaProfile {
    pub fn new(classifier: Arc<dyn Classifier>, placeholder: Placeholder) -> Self {
        Self {
            kind: classifier.kind(),
            classifier,
            placeholder,
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    pub async fn classify(&self, upload: &ValidatedUpload) -> Result<Annotation, AppError> {
        let object_uri = upload.object_uri();
        let start = std::time::Instant::now();

        let annotation = self
            .classifier
            .classify(&object_uri)
            .await
            .map_err(AppError::classification)?;

        tracing::info!(
            classifier = %self.classifier.name(),
            object_uri = %object_uri,
            verdict = %annotation.verdict(),
            peak = %annotation.peak(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload classified"
        );

        Ok(annotation)
    }
}
