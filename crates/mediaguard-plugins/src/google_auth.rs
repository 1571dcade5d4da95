//! Credential resolution for Google Cloud REST APIs

use anyhow::{Context, Result};
use mediaguard_core::{Config, SecretString};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Refresh this long before the metadata server says the token expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// How requests to Google APIs are authenticated
pub enum GoogleAuth {
    /// `key=` query parameter
    ApiKey(SecretString),
    /// Fixed bearer token, mostly for local runs (`gcloud auth print-access-token`)
    AccessToken(SecretString),
    /// Bearer token from the instance metadata server, cached until near expiry
    MetadataServer(MetadataTokenSource),
}

impl Debug for GoogleAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            GoogleAuth::ApiKey(_) => f.write_str("GoogleAuth::ApiKey"),
            GoogleAuth::AccessToken(_) => f.write_str("GoogleAuth::AccessToken"),
            GoogleAuth::MetadataServer(source) => f
                .debug_tuple("GoogleAuth::MetadataServer")
                .field(&source.endpoint)
                .finish(),
        }
    }
}

impl GoogleAuth {
    /// API key wins over a static token; otherwise fall back to the metadata server.
    pub fn from_config(config: &Config) -> Self {
        if let Some(key) = config.google_api_key() {
            return GoogleAuth::ApiKey(key.clone());
        }
        if let Some(token) = config.google_access_token() {
            return GoogleAuth::AccessToken(token.clone());
        }
        GoogleAuth::MetadataServer(MetadataTokenSource::new(METADATA_TOKEN_URL))
    }

    /// Attach credentials to an outgoing request
    pub async fn authorize(&self, client: &Client, request: RequestBuilder) -> Result<RequestBuilder> {
        match self {
            GoogleAuth::ApiKey(key) => Ok(request.query(&[("key", key.expose())])),
            GoogleAuth::AccessToken(token) => Ok(request.bearer_auth(token.expose())),
            GoogleAuth::MetadataServer(source) => {
                let token = source.token(client).await?;
                Ok(request.bearer_auth(token))
            }
        }
    }
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Access tokens from the GCE/Cloud Run metadata server
pub struct MetadataTokenSource {
    endpoint: String,
    cached: Mutex<Option<CachedToken>>,
}

impl MetadataTokenSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            cached: Mutex::new(None),
        }
    }

    pub async fn token(&self, client: &Client) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let response = client
            .get(&self.endpoint)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .context("Failed to reach metadata server for access token")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Metadata server token request failed: {} - {}",
                status,
                error_text
            ));
        }

        let body: MetadataTokenResponse = response
            .json()
            .await
            .context("Failed to parse metadata server token response")?;

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        tracing::debug!(expires_in_secs = body.expires_in, "Fetched access token from metadata server");

        *cached = Some(CachedToken {
            value: body.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(body.access_token)
    }
}

#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    expires_in: u64,
}
