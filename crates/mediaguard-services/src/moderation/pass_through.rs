//! Hand clear videos to the transcoding service.

use mediaguard_core::AppError;
use mediaguard_plugins::{TranscodeRequest, Transcoder};
use mediaguard_storage::Storage;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct PassThrough {
    storage: Arc<dyn Storage>,
    transcoder: Arc<dyn Transcoder>,
    url_ttl: Duration,
}

impl PassThrough {
    pub fn new(storage: Arc<dyn Storage>, transcoder: Arc<dyn Transcoder>, url_ttl: Duration) -> Self {
        Self {
            storage,
            transcoder,
            url_ttl,
        }
    }

    /// Base file name without its extension: `videos/b.mp4` is `b`.
    pub fn display_name(key: &str) -> String {
        let path = Path::new(key);
        path.file_stem()
            .or_else(|| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| key.to_string())
    }

    #[tracing::instrument(skip(self), fields(transcoder = %self.transcoder.name()))]
    pub async fn submit(&self, key: &str) -> Result<(), AppError> {
        let url = self
            .storage
            .get_presigned_url(key, self.url_ttl)
            .await
            .map_err(AppError::pass_through)?;

        let request = TranscodeRequest {
            url,
            name: Self::display_name(key),
            path: key.to_string(),
        };

        self.transcoder
            .submit(&request)
            .await
            .map_err(AppError::pass_through)?;

        tracing::info!(
            key = %key,
            name = %request.name,
            ttl_secs = self.url_ttl.as_secs(),
            "Clear video passed through for transcoding"
        );
        Ok(())
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use crate::test_support::RecordingTranscoder;
    use mediaguard_core::constants::DEFAULT_SIGNED_URL_TTL_SECS;
    use mediaguard_storage::LocalStorage;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::tempdir;

    fn unix_now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn test_display_name() {
        assert_eq!(PassThrough::display_name("videos/b.mp4"), "b");
        assert_eq!(PassThrough::display_name("b.mp4"), "b");
        assert_eq!(PassThrough::display_name("clips/2024/take.final.mov"), "take.final");
        assert_eq!(PassThrough::display_name("videos/raw"), "raw");
    }

    #[tokio::test]
    async fn test_submit_sends_signed_url_and_metadata() {
        let dir = tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(dir.path(), "http://localhost/media".to_string())
                .await
                .unwrap(),
        );
        let transcoder = Arc::new(RecordingTranscoder::default());
        let pass_through = PassThrough::new(
            storage,
            transcoder.clone(),
            Duration::from_secs(3600),
        );

        pass_through.submit("videos/b.mp4").await.unwrap();

        let requests = transcoder.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "b");
        assert_eq!(requests[0].path, "videos/b.mp4");
        assert!(requests[0]
            .url
            .starts_with("http://localhost/media/videos/b.mp4?expires="));
    }

    #[tokio::test]
    async fn test_signed_url_is_valid_for_configured_ttl() {
        let dir = tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(dir.path(), "http://localhost/media".to_string())
                .await
                .unwrap(),
        );
        let transcoder = Arc::new(RecordingTranscoder::default());
        let pass_through = PassThrough::new(
            storage,
            transcoder.clone(),
            Duration::from_secs(DEFAULT_SIGNED_URL_TTL_SECS),
        );

        let before = unix_now();
        pass_through.submit("videos/b.mp4").await.unwrap();
        let after = unix_now();

        let url = &transcoder.requests()[0].url;
        let expires: u64 = url
            .split_once("?expires=")
            .map(|(_, ts)| ts.parse().unwrap())
            .unwrap();
        assert_eq!(DEFAULT_SIGNED_URL_TTL_SECS, 3600);
        assert!(expires >= before + 3600, "expires {} too early", expires);
        assert!(expires <= after + 3600 + 1, "expires {} too late", expires);
    }

    #[tokio::test]
    async fn test_transcoder_failure_is_pass_through_error() {
        let dir = tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(dir.path(), "http://localhost/media".to_string())
                .await
                .unwrap(),
        );
        let pass_through = PassThrough::new(
            storage,
            Arc::new(RecordingTranscoder::failing()),
            Duration::from_secs(3600),
        );

        let err = pass_through.submit("videos/b.mp4").await.unwrap_err();
        assert!(matches!(err, AppError::PassThrough { .. }));
    }
}
