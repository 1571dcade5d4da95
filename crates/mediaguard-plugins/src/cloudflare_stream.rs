//! Cloudflare Stream "copy from URL" transcoder

use anyhow::{Context, Result};
use async_trait::async_trait;
use mediaguard_core::{Config, SecretString};
use serde::Serialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::plugin::{TranscodeRequest, Transcoder};

/// Submits clear videos to Cloudflare Stream, which pulls them from a signed URL
pub struct CloudflareStreamTranscoder {
    http_client: reqwest::Client,
    base_url: String,
    account_id: String,
    api_token: SecretString,
}

impl Debug for CloudflareStreamTranscoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudflareStreamTranscoder")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("api_token", &self.api_token)
            .finish()
    }
}

impl CloudflareStreamTranscoder {
    pub fn new(
        base_url: impl Into<String>,
        account_id: impl Into<String>,
        api_token: SecretString,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client for Cloudflare Stream")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            account_id: account_id.into(),
            api_token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.cloudflare_base_url(),
            config.cloudflare_account_id(),
            config.cloudflare_api_token().clone(),
        )
    }

    fn copy_url(&self) -> String {
        format!("{}/{}/stream/copy", self.base_url, self.account_id)
    }
}

#[derive(Debug, Serialize)]
struct CopyRequest<'a> {
    url: &'a str,
    meta: CopyMeta<'a>,
}

#[derive(Debug, Serialize)]
struct CopyMeta<'a> {
    name: &'a str,
    path: &'a str,
    #[serde(rename = "contentURI")]
    content_uri: &'a str,
    #[serde(rename = "contentRef")]
    content_ref: &'a str,
}

impl<'a> From<&'a TranscodeRequest> for CopyRequest<'a> {
    fn from(request: &'a TranscodeRequest) -> Self {
        CopyRequest {
            url: &request.url,
            meta: CopyMeta {
                name: &request.name,
                path: &request.path,
                content_uri: &request.url,
                content_ref: &request.path,
            },
        }
    }
}

#[async_trait]
impl Transcoder for CloudflareStreamTranscoder {
    fn name(&self) -> &str {
        "cloudflare_stream"
    }

    async fn submit(&self, request: &TranscodeRequest) -> Result<()> {
        let start = std::time::Instant::now();
        let url = self.copy_url();

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.api_token.expose())
            .json(&CopyRequest::from(request))
            .send()
            .await
            .context("Failed to send request to Cloudflare Stream")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Cloudflare Stream copy request failed: {} - {}",
                status,
                error_text
            ));
        }

        tracing::info!(
            path = %request.path,
            name = %request.name,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video submitted to Cloudflare Stream"
        );

        Ok(())
    }
}
