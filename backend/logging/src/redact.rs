//! Log Redaction
//!
//! Scrubs bearer tokens and reply tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());
static REPLY_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""replyToken"\s*:\s*"[^"]*""#).unwrap());

/// Redacts credentials embedded in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BEARER_RE.replace_all(input, "Bearer [REDACTED_TOKEN]");
    REPLY_TOKEN_RE
        .replace_all(&redacted, r#""replyToken":"[REDACTED]""#)
        .into_owned()
}
