//! Outbound reply units.

use serde::{Deserialize, Serialize};

use crate::error::StashError;

/// The platform accepts at most this many units in one reply request.
pub const MAX_REPLY_UNITS: usize = 5;

/// An emoji placeholder inside a text unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emoji {
    /// Character offset of the `$` placeholder in the text.
    pub index: usize,
    pub product_id: String,
    pub emoji_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyUnit {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emojis: Vec<Emoji>,
}

impl ReplyUnit {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), emojis: Vec::new() }
    }

    pub fn with_emoji(mut self, emoji: Emoji) -> Self {
        self.emojis.push(emoji);
        self
    }
}

/// Units sent against a single reply token.
///
/// Taken by value when sent, so a payload (and its token) is used once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPayload {
    reply_token: String,
    units: Vec<ReplyUnit>,
}

impl ReplyPayload {
    pub fn new(reply_token: impl Into<String>, units: Vec<ReplyUnit>) -> Result<Self, StashError> {
        if units.len() > MAX_REPLY_UNITS {
            return Err(StashError::ReplyTooLarge(units.len()));
        }
        Ok(Self { reply_token: reply_token.into(), units })
    }

    pub fn reply_token(&self) -> &str {
        &self.reply_token
    }

    pub fn units(&self) -> &[ReplyUnit] {
        &self.units
    }

    pub fn into_parts(self) -> (String, Vec<ReplyUnit>) {
        (self.reply_token, self.units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_reply() {
        let units = (0..6).map(|i| ReplyUnit::text(format!("line {i}"))).collect();
        assert!(matches!(ReplyPayload::new("T1", units), Err(StashError::ReplyTooLarge(6))));
    }

    #[test]
    fn emoji_serializes_camel_case() {
        let unit = ReplyUnit::text("$ thanks").with_emoji(Emoji {
            index: 0,
            product_id: "p".into(),
            emoji_id: "001".into(),
        });
        let json = serde_json::to_value(&unit).unwrap();
        assert_eq!(json["emojis"][0]["productId"], "p");
        assert_eq!(json["emojis"][0]["emojiId"], "001");
    }
}
