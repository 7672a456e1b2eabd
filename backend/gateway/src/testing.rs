//! Recording fakes for dispatcher and server tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use linestash_channels::sign;
use linestash_config::StashConfig;
use linestash_core::{
    Clock, MessagingApi, ObjectStore, ReplyModel, ReplyPayload, ReplyUnit, StashError,
};
use tempfile::TempDir;

use crate::dispatcher::{Dispatcher, DispatcherDeps, WebhookRequest};

/// Ordered record of every outbound call, shared by the fakes.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap()
    }
}

pub struct RecordingMessenger {
    journal: Journal,
    replies: Mutex<Vec<(String, Vec<ReplyUnit>)>>,
    pub fail_loading: bool,
    pub fail_download: bool,
}

impl RecordingMessenger {
    pub fn replies(&self) -> Vec<(String, Vec<ReplyUnit>)> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingApi for RecordingMessenger {
    async fn download_content(&self, message_id: &str) -> Result<Bytes, StashError> {
        self.journal.lock().unwrap().push(format!("download:{message_id}"));
        if self.fail_download {
            return Err(StashError::DownloadFailed {
                message_id: message_id.to_string(),
                reason: "404 Not Found".into(),
            });
        }
        Ok(Bytes::from(format!("content-of-{message_id}")))
    }

    async fn reply(&self, payload: ReplyPayload) -> Result<(), StashError> {
        let (token, units) = payload.into_parts();
        self.journal.lock().unwrap().push(format!("reply:{token}"));
        self.replies.lock().unwrap().push((token, units));
        Ok(())
    }

    async fn show_loading(&self, user_id: &str, _seconds: u32) -> Result<(), StashError> {
        self.journal.lock().unwrap().push(format!("loading:{user_id}"));
        if self.fail_loading {
            return Err(StashError::ReplyFailed("429 Too Many Requests".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub key: String,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

pub struct RecordingStore {
    journal: Journal,
    uploads: Mutex<Vec<Upload>>,
    /// Uploads whose key starts with this prefix fail.
    pub fail_prefix: Option<&'static str>,
}

impl RecordingStore {
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    fn name(&self) -> &str {
        "recording"
    }

    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: Option<&str>,
    ) -> Result<(), StashError> {
        self.journal.lock().unwrap().push(format!("upload:{key}"));
        if self.fail_prefix.is_some_and(|p| key.starts_with(p)) {
            return Err(StashError::UploadFailed { key: key.to_string(), reason: "denied".into() });
        }
        let content = tokio::fs::read(local_path).await?;
        self.uploads.lock().unwrap().push(Upload {
            key: key.to_string(),
            content_type: content_type.map(str::to_owned),
            content,
        });
        Ok(())
    }
}

pub struct ScriptedModel;

#[async_trait]
impl ReplyModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn respond(&self, text: &str) -> Result<Vec<String>, StashError> {
        Ok((1..=7).map(|i| format!("{text} #{i}")).collect())
    }
}

/// Options for building a harness.
#[derive(Default)]
pub struct HarnessOptions {
    pub fail_loading: bool,
    pub fail_download: bool,
    pub fail_upload_prefix: Option<&'static str>,
    pub configure: Option<fn(&mut StashConfig)>,
}

pub struct Harness {
    pub dispatcher: Arc<Dispatcher>,
    pub messenger: Arc<RecordingMessenger>,
    pub store: Arc<RecordingStore>,
    pub journal: Journal,
    pub scratch: TempDir,
}

impl Harness {
    pub const SECRET: &'static str = "test-channel-secret";

    pub fn new() -> Self {
        Self::with(HarnessOptions::default())
    }

    pub fn with(options: HarnessOptions) -> Self {
        let scratch = tempfile::tempdir().unwrap();
        let mut config = StashConfig::default();
        config.line.channel_secret = Some(Self::SECRET.into());
        config.line.channel_access_token = Some("token".into());
        config.storage.scratch_dir = Some(scratch.path().to_path_buf());
        if let Some(configure) = options.configure {
            configure(&mut config);
        }

        let journal = Journal::default();
        let messenger = Arc::new(RecordingMessenger {
            journal: journal.clone(),
            replies: Mutex::default(),
            fail_loading: options.fail_loading,
            fail_download: options.fail_download,
        });
        let store = Arc::new(RecordingStore {
            journal: journal.clone(),
            uploads: Mutex::default(),
            fail_prefix: options.fail_upload_prefix,
        });
        let dispatcher = Dispatcher::new(
            &config,
            DispatcherDeps {
                messaging: messenger.clone(),
                store: store.clone(),
                model: Arc::new(ScriptedModel),
                clock: Arc::new(FixedClock),
            },
        )
        .unwrap();

        Self { dispatcher: Arc::new(dispatcher), messenger, store, journal, scratch }
    }

    pub fn signed(body: &str) -> WebhookRequest {
        WebhookRequest {
            body: body.to_string(),
            signature: Some(sign(Self::SECRET, body.as_bytes()).unwrap()),
        }
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }

    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch.path()).unwrap().next().is_none()
    }
}
