//! LINE Webhook Receiver
//!
//! Signature validation and deserialization of inbound webhook payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use linestash_core::{InboundEvent, MessageKind, Source, StashError};
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

type HmacSha256 = Hmac<Sha256>;

/// Base64 HMAC-SHA256 of `body` keyed by the channel secret.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, StashError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| StashError::Config(format!("unusable channel secret: {e}")))?;
    mac.update(body);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Validates the `x-line-signature` value against the channel secret.
///
/// Comparison is constant-time; a signature that is not valid base64 fails.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct WebhookBody {
    events: Vec<WireEvent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    #[serde(rename = "type")]
    event_type: String,
    message: Option<WireMessage>,
    source: Option<WireSource>,
    reply_token: Option<String>,
    delivery_context: Option<DeliveryContext>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    id: String,
    text: Option<String>,
    package_id: Option<String>,
    sticker_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSource {
    #[serde(rename = "type")]
    kind: String,
    user_id: Option<String>,
    group_id: Option<String>,
    room_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryContext {
    #[serde(default)]
    is_redelivery: bool,
}

fn malformed(msg: impl Into<String>) -> StashError {
    StashError::MalformedPayload(msg.into())
}

impl WireSource {
    fn into_source(self) -> Result<Source, StashError> {
        let missing = |field: &str| malformed(format!("{} source without {field}", self.kind));
        let source = match self.kind.as_str() {
            "user" => Source::User { user_id: self.user_id.ok_or_else(|| missing("userId"))? },
            "group" => Source::Group {
                group_id: self.group_id.ok_or_else(|| missing("groupId"))?,
                user_id: self.user_id,
            },
            "room" => Source::Room {
                room_id: self.room_id.ok_or_else(|| missing("roomId"))?,
                user_id: self.user_id,
            },
            _ => Source::Other { kind: self.kind.clone() },
        };
        Ok(source)
    }
}

impl WireMessage {
    fn into_kind(self) -> (String, MessageKind) {
        let kind = match self.kind.as_str() {
            "text" => MessageKind::Text { text: self.text.unwrap_or_default() },
            "sticker" => MessageKind::Sticker {
                package_id: self.package_id.unwrap_or_default(),
                sticker_id: self.sticker_id.unwrap_or_default(),
            },
            "image" => MessageKind::Image,
            "video" => MessageKind::Video,
            "audio" => MessageKind::Audio,
            _ => MessageKind::Other { kind: self.kind },
        };
        (self.id, kind)
    }
}

/// Parse a webhook body into its message events.
///
/// Non-message events (follow, postback, join, ...) are skipped.
pub fn parse_webhook(body: &str) -> Result<Vec<InboundEvent>, StashError> {
    let parsed: WebhookBody = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;

    let mut events = Vec::with_capacity(parsed.events.len());
    for ev in parsed.events {
        if ev.event_type != "message" {
            debug!(event_type = %ev.event_type, "Skipping non-message event");
            continue;
        }
        let message = ev.message.ok_or_else(|| malformed("message event without message"))?;
        let source = ev.source.ok_or_else(|| malformed("message event without source"))?.into_source()?;
        let (message_id, kind) = message.into_kind();
        events.push(InboundEvent {
            message_id,
            reply_token: ev.reply_token,
            source,
            kind,
            redelivery: ev.delivery_context.is_some_and(|d| d.is_redelivery),
        });
    }
    Ok(events)
}
