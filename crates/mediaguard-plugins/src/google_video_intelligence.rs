//! Google Video Intelligence explicit-content classifier
//!
//! `videos:annotate` is a long-running operation: the submit call returns an operation
//! name, which is polled until `done`. Polling has no deadline of its own; callers bound
//! the whole classification with their request timeout.

use anyhow::{Context, Result};
use async_trait::async_trait;
use mediaguard_core::{Annotation, Config, Likelihood, MediaKind, VideoAnnotation};
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::google_auth::GoogleAuth;
use crate::plugin::Classifier;

pub struct GoogleVideoIntelligenceClassifier {
    http_client: reqwest::Client,
    auth: GoogleAuth,
    base_url: String,
    poll_interval: Duration,
}

impl Debug for GoogleVideoIntelligenceClassifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GoogleVideoIntelligenceClassifier")
            .field("base_url", &self.base_url)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl GoogleVideoIntelligenceClassifier {
    pub fn new(
        base_url: impl Into<String>,
        auth: GoogleAuth,
        poll_interval: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client for Video Intelligence API")?;

        Ok(Self {
            http_client,
            auth,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            poll_interval,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.video_intelligence_api_base_url(),
            GoogleAuth::from_config(config),
            config.video_poll_interval(),
        )
    }

    async fn start_annotation(&self, object_uri: &str) -> Result<String> {
        let url = format!("{}/v1/videos:annotate", self.base_url);
        let request_body = json!({
            "inputUri": object_uri,
            "features": ["EXPLICIT_CONTENT_DETECTION"]
        });

        let request = self.http_client.post(&url).json(&request_body);
        let request = self.auth.authorize(&self.http_client, request).await?;
        let operation: Operation = Self::read_json(
            request
                .send()
                .await
                .context("Failed to send request to Video Intelligence API")?,
        )
        .await?;

        operation
            .name
            .ok_or_else(|| anyhow::anyhow!("Video Intelligence API returned no operation name"))
    }

    async fn get_operation(&self, name: &str) -> Result<Operation> {
        let url = format!("{}/v1/{}", self.base_url, name);
        let request = self.http_client.get(&url);
        let request = self.auth.authorize(&self.http_client, request).await?;

        Self::read_json(
            request
                .send()
                .await
                .context("Failed to poll Video Intelligence operation")?,
        )
        .await
    }

    async fn read_json(response: reqwest::Response) -> Result<Operation> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Video Intelligence API request failed: {} - {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse Video Intelligence API response")
    }

    async fn wait_for(&self, name: &str) -> Result<Operation> {
        let mut polls: u32 = 0;
        loop {
            let operation = self.get_operation(name).await?;
            polls += 1;

            if operation.done {
                tracing::debug!(operation = %name, polls, "Video annotation operation finished");
                return Ok(operation);
            }

            tracing::debug!(operation = %name, polls, "Video annotation still running");
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Every frame of every annotation result, in order.
    fn to_annotation(operation: Operation) -> Result<VideoAnnotation> {
        if let Some(error) = operation.error {
            return Err(anyhow::anyhow!(
                "Video Intelligence operation failed: {:?} - {:?}",
                error.code,
                error.message
            ));
        }

        let frames = operation
            .response
            .map(|response| response.annotation_results)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|result| result.explicit_annotation)
            .flat_map(|explicit| explicit.frames)
            .map(|frame| frame.pornography_likelihood.unwrap_or_default())
            .collect();

        Ok(VideoAnnotation::new(frames))
    }
}

#[async_trait]
impl Classifier for GoogleVideoIntelligenceClassifier {
    fn name(&self) -> &str {
        "google_video_intelligence"
    }

    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    async fn classify(&self, object_uri: &str) -> Result<Annotation> {
        let start = std::time::Instant::now();
        let operation_name = self.start_annotation(object_uri).await?;
        tracing::info!(
            object_uri = %object_uri,
            operation = %operation_name,
            "Explicit content detection started"
        );

        let operation = self.wait_for(&operation_name).await?;
        let annotation = Self::to_annotation(operation)?;

        tracing::info!(
            object_uri = %object_uri,
            frames = annotation.frames.len(),
            peak = %annotation.frames.iter().copied().max().unwrap_or_default(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Explicit content detection completed"
        );

        Ok(Annotation::Video(annotation))
    }
}

// Video Intelligence API response structures

#[derive(Debug, Deserialize)]
struct Operation {
    name: Option<String>,
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<AnnotateVideoResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    code: Option<i32>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateVideoResponse {
    #[serde(default)]
    annotation_results: Vec<VideoAnnotationResults>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoAnnotationResults {
    explicit_annotation: Option<ExplicitContentAnnotation>,
}

#[derive(Debug, Deserialize)]
struct ExplicitContentAnnotation {
    #[serde(default)]
    frames: Vec<ExplicitContentFrame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplicitContentFrame {
    pornography_likelihood: Option<Likelihood>,
}
