//! linestash configuration schema.
//!
//! Typed for serde YAML/JSON with camelCase keys. Every section falls back to
//! its `Default` so a config can be assembled from the environment alone.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::defaults::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StashConfig {
    pub line: LineConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub dispatch: DispatchConfig,
    pub replies: RepliesConfig,
}

// ---------------------------------------------------------------------------
// LINE channel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_secret: Option<String>,
    pub api_base_url: String,
    pub data_api_base_url: String,
    /// Loading animation duration; the platform accepts multiples of 5 up to 60.
    pub loading_seconds: u32,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_access_token: None,
            channel_secret: None,
            api_base_url: DEFAULT_LINE_API_BASE_URL.to_string(),
            data_api_base_url: DEFAULT_LINE_DATA_API_BASE_URL.to_string(),
            loading_seconds: DEFAULT_LOADING_SECONDS,
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    Local,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Explicit credentials; the AWS default provider chain is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    /// S3-compatible endpoint (path-style addressing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Root directory for the `local` backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_dir: Option<PathBuf>,
    /// Prepended verbatim to log object keys.
    pub log_prefix: String,
    /// Where scratch files are written; the system temp dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
    /// Tag every media upload `image/jpeg`, matching objects stored by earlier deployments.
    pub legacy_jpeg_content_type: bool,
}

impl StorageConfig {
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub webhook_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            webhook_path: DEFAULT_WEBHOOK_PATH.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit console logs as JSON lines.
    pub json: bool,
    /// Directory for the daily-rolling NDJSON file; console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false, dir: None }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// What a failed payload log upload does to the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFailurePolicy {
    /// Fail the request with a server error before any event is handled.
    #[default]
    Abort,
    /// Log a warning and handle the events anyway.
    Continue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchConfig {
    pub log_failure: LogFailurePolicy,
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StickerReply {
    /// `$` marks where the emoji is placed.
    pub text: String,
    pub product_id: String,
    pub emoji_id: String,
}

impl Default for StickerReply {
    fn default() -> Self {
        Self {
            text: DEFAULT_STICKER_TEXT.to_string(),
            product_id: DEFAULT_STICKER_PRODUCT_ID.to_string(),
            emoji_id: DEFAULT_STICKER_EMOJI_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepliesConfig {
    /// Exact text -> ordered reply lines.
    pub triggers: BTreeMap<String, Vec<String>>,
    /// Text that hands the message to the reply model; disabled when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_trigger: Option<String>,
    /// Lines sent ahead of the elapsed-time line for unmatched text.
    pub default_lines: Vec<String>,
    pub media_saved: String,
    pub sticker: StickerReply,
}

impl Default for RepliesConfig {
    fn default() -> Self {
        let triggers = default_triggers()
            .into_iter()
            .map(|(k, lines)| (k.to_string(), lines.into_iter().map(String::from).collect()))
            .collect();
        Self {
            triggers,
            model_trigger: Some(DEFAULT_MODEL_TRIGGER.to_string()),
            default_lines: default_lines(),
            media_saved: DEFAULT_MEDIA_SAVED.to_string(),
            sticker: StickerReply::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_section_defaults() {
        let yaml = "server:\n  port: 9000\nreplies:\n  triggers:\n    ping: [pong]\n";
        let config: StashConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.webhook_path, DEFAULT_WEBHOOK_PATH);
        assert_eq!(config.replies.triggers["ping"], vec!["pong".to_string()]);
        assert_eq!(config.replies.model_trigger.as_deref(), Some(DEFAULT_MODEL_TRIGGER));
    }

    #[test]
    fn backend_and_policy_parse_lowercase() {
        let yaml = "storage:\n  backend: local\n  localDir: /srv/stash\ndispatch:\n  logFailure: continue\n";
        let config: StashConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(config.dispatch.log_failure, LogFailurePolicy::Continue);
    }
}
