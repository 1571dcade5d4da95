use anyhow::Context;
use mediaguard_core::{MediaKind, UploadEvent};
use serde::Serialize;
use std::path::Path;

/// Initialize tracing for CLI binaries. Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Guess a content type for a hand-typed object path. Uploads carry their own, so this
/// only backs `--content-type` when it is omitted.
pub fn guess_content_type(kind: MediaKind, path: &str) -> String {
    let extension = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let subtype = match (kind, extension.as_str()) {
        (MediaKind::Image, "jpg" | "jpeg") => "jpeg",
        (MediaKind::Image, "png") => "png",
        (MediaKind::Image, "gif") => "gif",
        (MediaKind::Image, "webp") => "webp",
        (MediaKind::Video, "mov") => "quicktime",
        (MediaKind::Video, "webm") => "webm",
        (MediaKind::Video, _) => "mp4",
        (MediaKind::Image, _) => "octet-stream",
    };
    format!("{}{}", kind.content_type_prefix(), subtype)
}

/// Build the event a storage trigger would have delivered for `path`.
pub fn event_for(
    kind: MediaKind,
    bucket: &str,
    path: &str,
    content_type: Option<&str>,
) -> UploadEvent {
    let content_type = content_type
        .map(String::from)
        .unwrap_or_else(|| guess_content_type(kind, path));
    UploadEvent::new(bucket, path, content_type)
}

/// Read a recorded storage object notification from disk.
pub fn read_event(file: &Path) -> anyhow::Result<UploadEvent> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid event in {}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn guess_content_type_by_extension() {
        assert_eq!(guess_content_type(MediaKind::Image, "photos/a.JPG"), "image/jpeg");
        assert_eq!(guess_content_type(MediaKind::Image, "photos/a.png"), "image/png");
        assert_eq!(guess_content_type(MediaKind::Video, "videos/b.mov"), "video/quicktime");
        assert_eq!(guess_content_type(MediaKind::Video, "videos/b"), "video/mp4");
    }

    #[test]
    fn event_for_prefers_explicit_content_type() {
        let event = event_for(MediaKind::Image, "uploads", "notes/a.txt", Some("text/plain"));
        assert_eq!(event.bucket, "uploads");
        assert_eq!(event.name.as_deref(), Some("notes/a.txt"));
        assert_eq!(event.content_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn read_event_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"bucket":"uploads","name":"videos/b.mp4","contentType":"video/mp4"}}"#
        )
        .unwrap();

        let event = read_event(file.path()).unwrap();
        assert_eq!(event.name.as_deref(), Some("videos/b.mp4"));
        assert!(event.validate(MediaKind::Video).is_ok());
    }
}
