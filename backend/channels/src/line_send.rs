//! LINE Senders
//!
//! Wire payloads for the reply and loading-animation endpoints.

use linestash_core::{Emoji, ReplyUnit};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest<'a> {
    pub reply_token: &'a str,
    pub messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TextMessage<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub emojis: &'a [Emoji],
}

impl<'a> From<&'a ReplyUnit> for TextMessage<'a> {
    fn from(unit: &'a ReplyUnit) -> Self {
        Self { kind: "text", text: &unit.text, emojis: &unit.emojis }
    }
}

impl<'a> ReplyRequest<'a> {
    pub fn new(reply_token: &'a str, units: &'a [ReplyUnit]) -> Self {
        Self { reply_token, messages: units.iter().map(TextMessage::from).collect() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingRequest<'a> {
    pub chat_id: &'a str,
    pub loading_seconds: u32,
}
