use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::StashError;
use crate::message::ReplyPayload;

/// Blob store addressed by key inside a configured bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Upload the file at `local_path` under `key`.
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: Option<&str>,
    ) -> Result<(), StashError>;
}

/// The messaging platform operations the bot consumes.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Fetch the binary content of a media message.
    async fn download_content(&self, message_id: &str) -> Result<Bytes, StashError>;

    /// Send a reply. Consumes the payload, and with it the reply token.
    async fn reply(&self, payload: ReplyPayload) -> Result<(), StashError>;

    /// Show the typing/loading animation in a one-to-one chat.
    async fn show_loading(&self, user_id: &str, seconds: u32) -> Result<(), StashError>;
}

/// Text generator behind the reserved model trigger.
#[async_trait]
pub trait ReplyModel: Send + Sync {
    fn name(&self) -> &str;

    async fn respond(&self, text: &str) -> Result<Vec<String>, StashError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
