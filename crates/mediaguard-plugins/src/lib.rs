//! Vendor integrations for media moderation
//!
//! Each integration sits behind its own cargo feature and implements one of the
//! capability traits in [`plugin`].

#[cfg(feature = "plugin")]
pub mod plugin;

#[cfg(feature = "google-auth")]
mod google_auth;
#[cfg(feature = "plugin-google-video-intelligence")]
mod google_video_intelligence;
#[cfg(feature = "plugin-google-vision")]
mod google_vision;
#[cfg(feature = "plugin-cloudflare-stream")]
mod cloudflare_stream;

#[cfg(feature = "plugin")]
pub use plugin::{Classifier, TranscodeRequest, Transcoder};

#[cfg(feature = "google-auth")]
pub use google_auth::{GoogleAuth, MetadataTokenSource};
#[cfg(feature = "plugin-google-video-intelligence")]
pub use google_video_intelligence::GoogleVideoIntelligenceClassifier;
#[cfg(feature = "plugin-google-vision")]
pub use google_vision::GoogleVisionClassifier;
#[cfg(feature = "plugin-cloudflare-stream")]
pub use cloudflare_stream::CloudflareStreamTranscoder;
