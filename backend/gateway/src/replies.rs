//! Reply text: the canned trigger table and the fixed confirmation lines.

use std::collections::HashMap;
use std::time::Duration;

use linestash_config::{RepliesConfig, StickerReply};
use linestash_core::{Emoji, ReplyUnit};

/// How a text message is answered.
#[derive(Debug, PartialEq, Eq)]
pub enum TextReply<'a> {
    Canned(&'a [String]),
    Model,
    Default,
}

pub struct ReplyTable {
    triggers: HashMap<String, Vec<String>>,
    model_trigger: Option<String>,
    default_lines: Vec<String>,
    media_saved: String,
    sticker: StickerReply,
}

impl ReplyTable {
    pub fn from_config(config: &RepliesConfig) -> Self {
        Self {
            triggers: config.triggers.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            model_trigger: config.model_trigger.clone(),
            default_lines: config.default_lines.clone(),
            media_saved: config.media_saved.clone(),
            sticker: config.sticker.clone(),
        }
    }

    /// Exact match only; canned triggers shadow the model trigger.
    pub fn lookup(&self, text: &str) -> TextReply<'_> {
        if let Some(lines) = self.triggers.get(text) {
            return TextReply::Canned(lines);
        }
        if self.model_trigger.as_deref() == Some(text) {
            return TextReply::Model;
        }
        TextReply::Default
    }

    /// Fallback for unmatched text: the default lines, then the elapsed time.
    pub fn default_reply(&self, elapsed: Duration) -> Vec<ReplyUnit> {
        let mut units: Vec<ReplyUnit> = self.default_lines.iter().map(ReplyUnit::text).collect();
        units.push(ReplyUnit::text(elapsed_line(elapsed)));
        units
    }

    pub fn media_reply(&self, elapsed: Duration) -> Vec<ReplyUnit> {
        vec![ReplyUnit::text(&self.media_saved), ReplyUnit::text(elapsed_line(elapsed))]
    }

    /// The sticker thank-you, with the emoji placed at the first `$`.
    pub fn sticker_reply(&self) -> ReplyUnit {
        let text = &self.sticker.text;
        let unit = ReplyUnit::text(text);
        match text.find('$') {
            Some(byte_pos) => unit.with_emoji(Emoji {
                // The platform counts emoji positions in UTF-16 code units.
                index: text[..byte_pos].encode_utf16().count(),
                product_id: self.sticker.product_id.clone(),
                emoji_id: self.sticker.emoji_id.clone(),
            }),
            None => unit,
        }
    }
}

pub fn elapsed_line(elapsed: Duration) -> String {
    format!("Time elapsed: {:.3} seconds.", elapsed.as_secs_f64())
}
