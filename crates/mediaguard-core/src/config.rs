//! Configuration module
//!
//! Process-wide settings are loaded once from the environment at startup and passed
//! down explicitly. Nothing below the binaries reads the environment.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::*;
use crate::error::AppError;
use crate::models::MediaKind;
use crate::storage_types::StorageBackend;

/// String that never shows up in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Debug for SecretString {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.0.is_empty() {
            f.write_str("\"\"")
        } else {
            f.write_str("\"[REDACTED]\"")
        }
    }
}

/// HTTP service settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    /// Upper bound on events handled at once by one instance
    pub max_concurrent_events: usize,
    /// Deadline for handling one event, end to end
    pub request_timeout_secs: u64,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            environment: "development".to_string(),
            max_concurrent_events: DEFAULT_MAX_CONCURRENT_EVENTS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Object a flagged upload is overwritten with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub key: String,
    pub content_type: String,
}

/// Moderation pipeline configuration
#[derive(Clone, Debug)]
pub struct ModerationConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub gcs_bucket: Option<String>,
    pub google_service_account_path: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    /// Root under which remediation stages placeholder copies
    pub scratch_dir: PathBuf,
    pub image_placeholder: Placeholder,
    pub video_placeholder: Placeholder,
    pub signed_url_ttl_secs: u64,
    // Classifier configuration
    pub google_api_key: Option<SecretString>,
    pub google_access_token: Option<SecretString>,
    pub vision_api_base_url: String,
    pub video_intelligence_api_base_url: String,
    pub video_poll_interval_ms: u64,
    // Transcoding service configuration
    pub cloudflare_base_url: String,
    pub cloudflare_account_id: String,
    pub cloudflare_api_token: SecretString,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            storage_backend: StorageBackend::Local,
            gcs_bucket: None,
            google_service_account_path: None,
            local_storage_path: None,
            local_storage_base_url: None,
            scratch_dir: env::temp_dir(),
            image_placeholder: Placeholder {
                key: DEFAULT_IMAGE_PLACEHOLDER_KEY.to_string(),
                content_type: DEFAULT_IMAGE_PLACEHOLDER_CONTENT_TYPE.to_string(),
            },
            video_placeholder: Placeholder {
                key: DEFAULT_VIDEO_PLACEHOLDER_KEY.to_string(),
                content_type: DEFAULT_VIDEO_PLACEHOLDER_CONTENT_TYPE.to_string(),
            },
            signed_url_ttl_secs: DEFAULT_SIGNED_URL_TTL_SECS,
            google_api_key: None,
            google_access_token: None,
            vision_api_base_url: DEFAULT_VISION_API_BASE_URL.to_string(),
            video_intelligence_api_base_url: DEFAULT_VIDEO_INTELLIGENCE_API_BASE_URL.to_string(),
            video_poll_interval_ms: DEFAULT_VIDEO_POLL_INTERVAL_MS,
            cloudflare_base_url: String::new(),
            cloudflare_account_id: String::new(),
            cloudflare_api_token: SecretString::default(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ModerationConfig>);

impl From<ModerationConfig> for Config {
    fn from(config: ModerationConfig) -> Self {
        Config(Box::new(config))
    }
}

impl Config {
    fn inner(&self) -> &ModerationConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ModerationConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    /// Warm-instance hint for the hosting platform. Not a functional input.
    pub fn min_instances(&self) -> u32 {
        if self.is_production() {
            1
        } else {
            0
        }
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn max_concurrent_events(&self) -> usize {
        self.inner().base.max_concurrent_events
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().base.request_timeout_secs)
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn gcs_bucket(&self) -> Option<&str> {
        self.inner().gcs_bucket.as_deref()
    }

    pub fn google_service_account_path(&self) -> Option<&str> {
        self.inner().google_service_account_path.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn scratch_dir(&self) -> &PathBuf {
        &self.inner().scratch_dir
    }

    pub fn placeholder(&self, kind: MediaKind) -> &Placeholder {
        match kind {
            MediaKind::Image => &self.inner().image_placeholder,
            MediaKind::Video => &self.inner().video_placeholder,
        }
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.inner().signed_url_ttl_secs)
    }

    pub fn google_api_key(&self) -> Option<&SecretString> {
        self.inner().google_api_key.as_ref()
    }

    pub fn google_access_token(&self) -> Option<&SecretString> {
        self.inner().google_access_token.as_ref()
    }

    pub fn vision_api_base_url(&self) -> &str {
        &self.inner().vision_api_base_url
    }

    pub fn video_intelligence_api_base_url(&self) -> &str {
        &self.inner().video_intelligence_api_base_url
    }

    pub fn video_poll_interval(&self) -> Duration {
        Duration::from_millis(self.inner().video_poll_interval_ms)
    }

    pub fn cloudflare_base_url(&self) -> &str {
        &self.inner().cloudflare_base_url
    }

    pub fn cloudflare_account_id(&self) -> &str {
        &self.inner().cloudflare_account_id
    }

    pub fn cloudflare_api_token(&self) -> &SecretString {
        &self.inner().cloudflare_api_token
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl ModerationConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Missing .env is fine; real deployments set the environment directly
        let _ = dotenvy::dotenv();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            max_concurrent_events: env::var("MAX_CONCURRENT_EVENTS")
                .unwrap_or_else(|_| DEFAULT_MAX_CONCURRENT_EVENTS.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_CONCURRENT_EVENTS),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let storage_backend = match non_empty("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Gcs,
        };

        let config = ModerationConfig {
            base,
            storage_backend,
            gcs_bucket: non_empty("GCS_BUCKET"),
            google_service_account_path: non_empty("GOOGLE_SERVICE_ACCOUNT_PATH")
                .or_else(|| non_empty("GOOGLE_APPLICATION_CREDENTIALS")),
            local_storage_path: non_empty("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty("LOCAL_STORAGE_BASE_URL"),
            scratch_dir: non_empty("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            image_placeholder: Placeholder {
                key: non_empty("IMAGE_PLACEHOLDER_KEY")
                    .unwrap_or_else(|| DEFAULT_IMAGE_PLACEHOLDER_KEY.to_string()),
                content_type: non_empty("IMAGE_PLACEHOLDER_CONTENT_TYPE")
                    .unwrap_or_else(|| DEFAULT_IMAGE_PLACEHOLDER_CONTENT_TYPE.to_string()),
            },
            video_placeholder: Placeholder {
                key: non_empty("VIDEO_PLACEHOLDER_KEY")
                    .unwrap_or_else(|| DEFAULT_VIDEO_PLACEHOLDER_KEY.to_string()),
                content_type: non_empty("VIDEO_PLACEHOLDER_CONTENT_TYPE")
                    .unwrap_or_else(|| DEFAULT_VIDEO_PLACEHOLDER_CONTENT_TYPE.to_string()),
            },
            signed_url_ttl_secs: env::var("SIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| DEFAULT_SIGNED_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_SIGNED_URL_TTL_SECS),
            google_api_key: non_empty("GOOGLE_API_KEY").map(SecretString::new),
            google_access_token: non_empty("GOOGLE_ACCESS_TOKEN").map(SecretString::new),
            vision_api_base_url: non_empty("VISION_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_VISION_API_BASE_URL.to_string()),
            video_intelligence_api_base_url: non_empty("VIDEO_INTELLIGENCE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_VIDEO_INTELLIGENCE_API_BASE_URL.to_string()),
            video_poll_interval_ms: env::var("VIDEO_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| DEFAULT_VIDEO_POLL_INTERVAL_MS.to_string())
                .parse()
                .unwrap_or(DEFAULT_VIDEO_POLL_INTERVAL_MS),
            cloudflare_base_url: non_empty("CLOUDFLARE_BASE_URL").ok_or_else(|| {
                anyhow::anyhow!("CLOUDFLARE_BASE_URL must be set for video pass-through")
            })?,
            cloudflare_account_id: non_empty("CLOUDFLARE_ACCOUNT_ID").ok_or_else(|| {
                anyhow::anyhow!("CLOUDFLARE_ACCOUNT_ID must be set for video pass-through")
            })?,
            cloudflare_api_token: non_empty("CLOUDFLARE_API_TOKEN")
                .map(SecretString::new)
                .ok_or_else(|| {
                    anyhow::anyhow!("CLOUDFLARE_API_TOKEN must be set for video pass-through")
                })?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.base.max_concurrent_events == 0 {
            return Err(AppError::Config(
                "MAX_CONCURRENT_EVENTS must be greater than zero".to_string(),
            ));
        }

        if self.signed_url_ttl_secs == 0 {
            return Err(AppError::Config(
                "SIGNED_URL_TTL_SECS must be greater than zero".to_string(),
            ));
        }

        if self.image_placeholder.key.trim().is_empty()
            || self.video_placeholder.key.trim().is_empty()
        {
            return Err(AppError::Config(
                "IMAGE_PLACEHOLDER_KEY and VIDEO_PLACEHOLDER_KEY must not be empty".to_string(),
            ));
        }

        if !self.cloudflare_base_url.starts_with("http://")
            && !self.cloudflare_base_url.starts_with("https://")
        {
            return Err(AppError::Config(
                "CLOUDFLARE_BASE_URL must be an http(s) URL".to_string(),
            ));
        }

        if self.cloudflare_account_id.trim().is_empty() || self.cloudflare_api_token.is_empty() {
            return Err(AppError::Config(
                "CLOUDFLARE_ACCOUNT_ID and CLOUDFLARE_API_TOKEN must be set".to_string(),
            ));
        }

        // Validate storage backend configuration
        match self.storage_backend {
            StorageBackend::Gcs => {
                if self.gcs_bucket.is_none() {
                    return Err(AppError::Config(
                        "GCS_BUCKET must be set when using GCS storage backend".to_string(),
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(AppError::Config(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend".to_string(),
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(AppError::Config(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}
