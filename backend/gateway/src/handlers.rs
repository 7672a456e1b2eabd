//! Per message-kind reply logic.
//!
//! Handlers decide what to say; they never send. The dispatcher owns the
//! reply token and sends at most once per event.

use std::sync::Arc;
use std::time::Instant;

use linestash_core::{
    InboundEvent, MAX_REPLY_UNITS, MediaKind, MessageKind, MessagingApi, ReplyModel, ReplyUnit,
    Source, StashError,
};
use linestash_media::MediaPersister;
use tracing::{debug, info, warn};

use crate::replies::{ReplyTable, TextReply};

pub struct ReplyHandlers {
    replies: ReplyTable,
    persister: MediaPersister,
    messaging: Arc<dyn MessagingApi>,
    model: Arc<dyn ReplyModel>,
    loading_seconds: u32,
}

impl ReplyHandlers {
    pub fn new(
        replies: ReplyTable,
        persister: MediaPersister,
        messaging: Arc<dyn MessagingApi>,
        model: Arc<dyn ReplyModel>,
        loading_seconds: u32,
    ) -> Self {
        Self { replies, persister, messaging, model, loading_seconds }
    }

    /// Units to reply with, or `None` when the event is ignored.
    pub async fn handle(
        &self,
        event: &InboundEvent,
        started: Instant,
    ) -> Result<Option<Vec<ReplyUnit>>, StashError> {
        match &event.kind {
            MessageKind::Text { text } => self.handle_text(event, text, started).await.map(Some),
            MessageKind::Sticker { .. } => Ok(self.handle_sticker(event)),
            MessageKind::Image => self.handle_media(event, MediaKind::Image, started).await.map(Some),
            MessageKind::Video => self.handle_media(event, MediaKind::Video, started).await.map(Some),
            MessageKind::Audio => self.handle_media(event, MediaKind::Audio, started).await.map(Some),
            MessageKind::Other { kind } => {
                debug!(kind = %kind, "Ignoring message kind");
                Ok(None)
            }
        }
    }

    async fn handle_text(
        &self,
        event: &InboundEvent,
        text: &str,
        started: Instant,
    ) -> Result<Vec<ReplyUnit>, StashError> {
        if let Source::User { user_id } = &event.source {
            if let Err(e) = self.messaging.show_loading(user_id, self.loading_seconds).await {
                warn!(error = %e, "Loading indicator failed; replying anyway");
            }
        }

        match self.replies.lookup(text) {
            TextReply::Canned(lines) => {
                debug!(trigger = %text, lines = lines.len(), "Canned reply");
                Ok(lines.iter().map(ReplyUnit::text).collect())
            }
            TextReply::Model => {
                let mut lines = self.model.respond(text).await?;
                if lines.len() > MAX_REPLY_UNITS {
                    warn!(model = self.model.name(), lines = lines.len(), "Truncating model reply");
                    lines.truncate(MAX_REPLY_UNITS);
                }
                Ok(lines.into_iter().map(ReplyUnit::text).collect())
            }
            TextReply::Default => Ok(self.replies.default_reply(started.elapsed())),
        }
    }

    /// Stickers are only acknowledged in one-to-one chats.
    fn handle_sticker(&self, event: &InboundEvent) -> Option<Vec<ReplyUnit>> {
        if !event.source.is_user() {
            debug!(source = event.source.kind(), "Ignoring sticker outside a user chat");
            return None;
        }
        Some(vec![self.replies.sticker_reply()])
    }

    async fn handle_media(
        &self,
        event: &InboundEvent,
        kind: MediaKind,
        started: Instant,
    ) -> Result<Vec<ReplyUnit>, StashError> {
        let stored = self.persister.persist(event, kind).await?;
        info!(key = %stored.key, "Media persisted");
        Ok(self.replies.media_reply(started.elapsed()))
    }
}
