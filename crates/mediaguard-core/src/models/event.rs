//! Object-finalized notifications as delivered by the storage trigger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::moderation::MediaKind;

/// A finalized upload, in the shape of the Cloud Storage object resource.
///
/// Only `bucket` is mandatory on the wire; everything else may be absent and is
/// checked by [`UploadEvent::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadEvent {
    pub bucket: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl UploadEvent {
    pub fn new(
        bucket: impl Into<String>,
        name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            name: Some(name.into()),
            content_type: Some(content_type.into()),
            time_created: Some(Utc::now()),
            metadata: HashMap::new(),
        }
    }

    /// Check the event is something the given trigger should act on.
    pub fn validate(&self, kind: MediaKind) -> Result<ValidatedUpload, Rejection> {
        // Whitespace is legal in object names, so the key stays verbatim
        let key = match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => return Err(Rejection::MissingPath),
        };

        let content_type = self.content_type.clone().unwrap_or_default();
        if !content_type
            .to_lowercase()
            .starts_with(kind.content_type_prefix())
        {
            return Err(Rejection::UnsupportedContentType {
                content_type,
                expected: kind.content_type_prefix(),
            });
        }

        Ok(ValidatedUpload {
            kind,
            bucket: self.bucket.clone(),
            key,
            content_type,
        })
    }
}

/// An upload that passed trigger validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub kind: MediaKind,
    pub bucket: String,
    pub key: String,
    pub content_type: String,
}

impl ValidatedUpload {
    /// `gs://{bucket}/{key}`, the form the classifiers read from.
    pub fn object_uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.key)
    }
}

/// Why an event was ignored. Rejections are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    MissingPath,
    UnsupportedContentType {
        content_type: String,
        expected: &'static str,
    },
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Rejection::MissingPath => f.write_str("object not found"),
            Rejection::UnsupportedContentType {
                content_type,
                expected,
            } => write!(
                f,
                "content type '{}' does not match '{}*'",
                content_type, expected
            ),
        }
    }
}
