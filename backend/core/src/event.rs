//! Inbound webhook events, reduced to what the handlers act on.

use serde::Serialize;

use crate::error::StashError;

/// One message notification from the webhook body.
///
/// Built per request and dropped when the request completes; only the raw
/// body is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundEvent {
    pub message_id: String,
    /// Single-use token for replying on the originating channel.
    pub reply_token: Option<String>,
    pub source: Source,
    pub kind: MessageKind,
    /// Set when the platform is re-sending an event it could not confirm.
    pub redelivery: bool,
}

/// Where a message originated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Source {
    User { user_id: String },
    Group { group_id: String, user_id: Option<String> },
    Room { room_id: String, user_id: Option<String> },
    /// A source kind the protocol does not define today.
    Other { kind: String },
}

impl Source {
    /// The identifier used to namespace stored artifacts.
    pub fn resolve(&self) -> Result<&str, StashError> {
        match self {
            Source::User { user_id } => Ok(user_id),
            Source::Group { group_id, .. } => Ok(group_id),
            Source::Room { room_id, .. } => Ok(room_id),
            Source::Other { kind } => Err(StashError::UnknownSourceKind(kind.clone())),
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Source::User { .. } => "user",
            Source::Group { .. } => "group",
            Source::Room { .. } => "room",
            Source::Other { kind } => kind,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Source::User { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageKind {
    Text { text: String },
    Sticker { package_id: String, sticker_id: String },
    Image,
    Video,
    Audio,
    Other { kind: String },
}

impl MessageKind {
    pub fn name(&self) -> &str {
        match self {
            MessageKind::Text { .. } => "text",
            MessageKind::Sticker { .. } => "sticker",
            MessageKind::Image => "image",
            MessageKind::Video => "video",
            MessageKind::Audio => "audio",
            MessageKind::Other { kind } => kind,
        }
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            MessageKind::Image => Some(MediaKind::Image),
            MessageKind::Video => Some(MediaKind::Video),
            MessageKind::Audio => Some(MediaKind::Audio),
            _ => None,
        }
    }
}

/// Message kinds whose binary content gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
            MediaKind::Audio => "m4a",
        }
    }
}
