//! Google Cloud Vision safe-search classifier for still images

use anyhow::{Context, Result};
use async_trait::async_trait;
use mediaguard_core::{Annotation, Config, ImageAnnotation, Likelihood, MediaKind};
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::google_auth::GoogleAuth;
use crate::plugin::Classifier;

/// Safe-search classification through the Vision `images:annotate` endpoint
pub struct GoogleVisionClassifier {
    http_client: reqwest::Client,
    auth: GoogleAuth,
    base_url: String,
}

impl Debug for GoogleVisionClassifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GoogleVisionClassifier")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish()
    }
}

impl GoogleVisionClassifier {
    pub fn new(base_url: impl Into<String>, auth: GoogleAuth) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client for Google Vision API")?;

        Ok(Self {
            http_client,
            auth,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.vision_api_base_url(), GoogleAuth::from_config(config))
    }

    async fn annotate_image(&self, object_uri: &str) -> Result<VisionResponse> {
        let url = format!("{}/v1/images:annotate", self.base_url);

        let request_body = json!({
            "requests": [{
                "image": {
                    "source": { "imageUri": object_uri }
                },
                "features": [{ "type": "SAFE_SEARCH_DETECTION" }]
            }]
        });

        let request = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request_body);
        let request = self.auth.authorize(&self.http_client, request).await?;

        let response = request
            .send()
            .await
            .context("Failed to send request to Google Vision API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Google Vision API request failed: {} - {}",
                status,
                error_text
            ));
        }

        let vision_response: VisionResponse = response
            .json()
            .await
            .context("Failed to parse Google Vision API response")?;

        // A per-image error comes back inside a 200
        if let Some(error) = vision_response
            .responses
            .first()
            .and_then(|r| r.error.as_ref())
        {
            return Err(anyhow::anyhow!(
                "Google Vision API error: {:?} - {:?}",
                error.code,
                error.message
            ));
        }

        Ok(vision_response)
    }

    fn to_annotation(response: &VisionResponse) -> ImageAnnotation {
        response
            .responses
            .first()
            .and_then(|r| r.safe_search_annotation.as_ref())
            .map(|safe_search| ImageAnnotation {
                adult: safe_search.adult,
                violence: safe_search.violence,
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Classifier for GoogleVisionClassifier {
    fn name(&self) -> &str {
        "google_vision"
    }

    fn kind(&self) -> MediaKind {
        MediaKind::Image
    }

    async fn classify(&self, object_uri: &str) -> Result<Annotation> {
        let start = std::time::Instant::now();
        let response = self.annotate_image(object_uri).await?;
        let annotation = Self::to_annotation(&response);

        tracing::info!(
            object_uri = %object_uri,
            adult = %annotation.adult.unwrap_or_default(),
            violence = %annotation.violence.unwrap_or_default(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Safe search detection completed"
        );

        Ok(Annotation::Image(annotation))
    }
}

// Google Vision API response structures

#[derive(Debug, Deserialize)]
struct VisionResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    safe_search_annotation: Option<SafeSearchAnnotation>,
    error: Option<VisionError>,
}

#[derive(Debug, Deserialize)]
struct SafeSearchAnnotation {
    adult: Option<Likelihood>,
    violence: Option<Likelihood>,
}

#[derive(Debug, Deserialize)]
struct VisionError {
    code: Option<i32>,
    message: Option<String>,
}
