//! Defaults shared by configuration and services.

/// Placeholder written over flagged images.
pub const DEFAULT_IMAGE_PLACEHOLDER_KEY: &str = "prohibited.png";
pub const DEFAULT_IMAGE_PLACEHOLDER_CONTENT_TYPE: &str = "image/png";

/// Placeholder written over flagged videos.
pub const DEFAULT_VIDEO_PLACEHOLDER_KEY: &str = "annotate.mp4";
pub const DEFAULT_VIDEO_PLACEHOLDER_CONTENT_TYPE: &str = "video/mp4";

/// Validity window of the read URL handed to the transcoding service.
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 60 * 60;

pub const DEFAULT_VISION_API_BASE_URL: &str = "https://vision.googleapis.com";
pub const DEFAULT_VIDEO_INTELLIGENCE_API_BASE_URL: &str = "https://videointelligence.googleapis.com";
pub const DEFAULT_VIDEO_POLL_INTERVAL_MS: u64 = 5_000;

pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_MAX_CONCURRENT_EVENTS: usize = 100;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
