/// Largest notification body accepted. Object notifications are a few KiB at most.
pub const MAX_EVENT_BODY_BYTES: usize = 1024 * 1024;

pub const IMAGE_EVENTS_PATH: &str = "/events/image";
pub const VIDEO_EVENTS_PATH: &str = "/events/video";
pub const HEALTH_PATH: &str = "/health";

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "mediaguard=debug,tower_http=info";
