//! Media persistence: platform content -> scratch file -> object storage.

use std::path::PathBuf;
use std::sync::Arc;

use linestash_core::{
    Clock, InboundEvent, MediaKind, MessagingApi, ObjectStore, StashError, artifact_stamp,
    media_file_name, media_key,
};
use linestash_storage::ScratchFile;
use tracing::{info, warn};

use crate::mime_detect::upload_content_type;

/// What ended up in the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub key: String,
    pub content_type: &'static str,
    pub size: usize,
}

pub struct MediaPersister {
    messaging: Arc<dyn MessagingApi>,
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
    scratch_dir: PathBuf,
    legacy_jpeg: bool,
}

impl MediaPersister {
    pub fn new(
        messaging: Arc<dyn MessagingApi>,
        store: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self { messaging, store, clock, scratch_dir: scratch_dir.into(), legacy_jpeg: false }
    }

    /// Tag every upload `image/jpeg` regardless of kind.
    pub fn with_legacy_jpeg(mut self, legacy_jpeg: bool) -> Self {
        self.legacy_jpeg = legacy_jpeg;
        self
    }

    /// Download the event's content and store it under
    /// `{ext}/{sourceIdentity}-{stamp}.{ext}`.
    pub async fn persist(
        &self,
        event: &InboundEvent,
        kind: MediaKind,
    ) -> Result<StoredMedia, StashError> {
        let source_id = event.source.resolve()?;
        let stamp = artifact_stamp(self.clock.now());
        let file_name = media_file_name(source_id, &stamp, kind);
        let key = media_key(source_id, &stamp, kind);
        let content_type = upload_content_type(kind, self.legacy_jpeg);

        let content = self.messaging.download_content(&event.message_id).await?;
        let scratch = ScratchFile::write(self.scratch_dir.join(&file_name), &content).await?;

        self.store.upload(scratch.path(), &key, Some(content_type)).await?;

        if let Err(e) = scratch.close() {
            warn!(file = %file_name, error = %e, "Failed to remove media scratch file");
        }
        info!(
            key = %key,
            message_id = %event.message_id,
            content_type,
            size = content.len(),
            "Stored media"
        );
        Ok(StoredMedia { key, content_type, size: content.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::{DateTime, TimeZone, Utc};
    use linestash_core::{MessageKind, ReplyPayload, Source};
    use linestash_storage::LocalDirStore;
    use std::path::Path;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
        }
    }

    /// Serves fixed content, or fails every download when `content` is None.
    struct ContentOnly {
        content: Option<&'static [u8]>,
    }

    #[async_trait]
    impl MessagingApi for ContentOnly {
        async fn download_content(&self, message_id: &str) -> Result<Bytes, StashError> {
            self.content.map(Bytes::from_static).ok_or_else(|| StashError::DownloadFailed {
                message_id: message_id.to_string(),
                reason: "gone".into(),
            })
        }

        async fn reply(&self, _: ReplyPayload) -> Result<(), StashError> {
            unreachable!("the persister never replies")
        }

        async fn show_loading(&self, _: &str, _: u32) -> Result<(), StashError> {
            unreachable!("the persister never shows loading")
        }
    }

    struct RejectingStore;

    #[async_trait]
    impl ObjectStore for RejectingStore {
        fn name(&self) -> &str {
            "rejecting"
        }

        async fn upload(&self, _: &Path, key: &str, _: Option<&str>) -> Result<(), StashError> {
            Err(StashError::UploadFailed { key: key.to_string(), reason: "denied".into() })
        }
    }

    fn event(kind: MessageKind, source: Source) -> InboundEvent {
        InboundEvent {
            message_id: "M1".into(),
            reply_token: Some("T1".into()),
            source,
            kind,
            redelivery: false,
        }
    }

    fn group() -> Source {
        Source::Group { group_id: "G1".into(), user_id: None }
    }

    fn is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn stores_image_under_extension_partition() {
        let bucket = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let persister = MediaPersister::new(
            Arc::new(ContentOnly { content: Some(b"\xff\xd8jpeg") }),
            Arc::new(LocalDirStore::new(bucket.path())),
            Arc::new(FixedClock),
            scratch.path(),
        );

        let stored = persister.persist(&event(MessageKind::Image, group()), MediaKind::Image).await.unwrap();

        assert_eq!(stored.key, "jpg/G1-2024-05-06-07-08-09-000000.jpg");
        assert_eq!(stored.content_type, "image/jpeg");
        assert_eq!(std::fs::read(bucket.path().join(&stored.key)).unwrap(), b"\xff\xd8jpeg");
        assert!(is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn audio_gets_its_own_type_unless_legacy() {
        let bucket = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let persister = MediaPersister::new(
            Arc::new(ContentOnly { content: Some(b"m4a") }),
            Arc::new(LocalDirStore::new(bucket.path())),
            Arc::new(FixedClock),
            scratch.path(),
        );
        let user = Source::User { user_id: "U1".into() };

        let stored = persister.persist(&event(MessageKind::Audio, user.clone()), MediaKind::Audio).await.unwrap();
        assert_eq!(stored.key, "m4a/U1-2024-05-06-07-08-09-000000.m4a");
        assert_eq!(stored.content_type, "audio/mp4");

        let legacy = persister.with_legacy_jpeg(true);
        let stored = legacy.persist(&event(MessageKind::Audio, user), MediaKind::Audio).await.unwrap();
        assert_eq!(stored.content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn scratch_removed_when_upload_fails() {
        let scratch = tempfile::tempdir().unwrap();
        let persister = MediaPersister::new(
            Arc::new(ContentOnly { content: Some(b"mp4") }),
            Arc::new(RejectingStore),
            Arc::new(FixedClock),
            scratch.path(),
        );

        let err = persister.persist(&event(MessageKind::Video, group()), MediaKind::Video).await.unwrap_err();

        assert!(matches!(err, StashError::UploadFailed { ref key, .. } if key.starts_with("mp4/G1-")));
        assert!(is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn download_failure_writes_nothing() {
        let bucket = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let persister = MediaPersister::new(
            Arc::new(ContentOnly { content: None }),
            Arc::new(LocalDirStore::new(bucket.path())),
            Arc::new(FixedClock),
            scratch.path(),
        );

        let err = persister.persist(&event(MessageKind::Image, group()), MediaKind::Image).await.unwrap_err();

        assert!(matches!(err, StashError::DownloadFailed { .. }));
        assert!(is_empty(scratch.path()));
        assert!(is_empty(bucket.path()));
    }

    #[tokio::test]
    async fn unknown_source_fails_before_download() {
        let scratch = tempfile::tempdir().unwrap();
        let persister = MediaPersister::new(
            Arc::new(ContentOnly { content: None }),
            Arc::new(RejectingStore),
            Arc::new(FixedClock),
            scratch.path(),
        );
        let source = Source::Other { kind: "channel".into() };

        let err = persister.persist(&event(MessageKind::Image, source), MediaKind::Image).await.unwrap_err();

        assert!(matches!(err, StashError::UnknownSourceKind(_)));
    }
}
