//! Config validation: deep checks with user-friendly error messages.

use crate::schema::{StashConfig, StorageBackend};
use thiserror::Error;

/// Most units a single reply may carry.
const MAX_REPLY_LINES: usize = 5;

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError { path: path.into(), message: message.into() });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError { path: path.into(), message: message.into() });
    }
}

/// Validate the config and return every error and warning found.
pub fn validate(config: &StashConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_line(config, &mut report);
    validate_storage(config, &mut report);
    validate_server(config, &mut report);
    validate_logging(config, &mut report);
    validate_replies(config, &mut report);
    report
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn validate_line(config: &StashConfig, report: &mut ValidationReport) {
    let line = &config.line;
    if is_blank(&line.channel_secret) {
        report.error("line.channelSecret", "Channel secret is required to verify webhooks");
    }
    if is_blank(&line.channel_access_token) {
        report.error("line.channelAccessToken", "Channel access token is required to reply");
    }
    if line.loading_seconds == 0 || line.loading_seconds > 60 || line.loading_seconds % 5 != 0 {
        report.error("line.loadingSeconds", "Must be a multiple of 5 between 5 and 60");
    }
}

fn validate_storage(config: &StashConfig, report: &mut ValidationReport) {
    let storage = &config.storage;
    match storage.backend {
        StorageBackend::S3 => {
            if is_blank(&storage.bucket) {
                report.error("storage.bucket", "Bucket name is required for the s3 backend");
            }
            if is_blank(&storage.region) {
                report.error("storage.region", "Region is required for the s3 backend");
            }
            if storage.access_key_id.is_some() != storage.secret_access_key.is_some() {
                report.error(
                    "storage.accessKeyId",
                    "Explicit credentials need both accessKeyId and secretAccessKey",
                );
            }
        }
        StorageBackend::Local => {
            if storage.local_dir.is_none() {
                report.error("storage.localDir", "Directory is required for the local backend");
            }
        }
    }
    if !storage.log_prefix.is_empty() && !storage.log_prefix.ends_with('/') {
        report.warn("storage.logPrefix", "Prefix does not end with '/'; log keys will be glued to it");
    }
    if storage.legacy_jpeg_content_type {
        report.warn("storage.legacyJpegContentType", "Video and audio uploads will be tagged image/jpeg");
    }
}

fn validate_server(config: &StashConfig, report: &mut ValidationReport) {
    if !config.server.webhook_path.starts_with('/') {
        report.error("server.webhookPath", "Path must start with '/'");
    }
    if config.server.port == 0 {
        report.error("server.port", "Port cannot be 0");
    }
}

fn validate_logging(config: &StashConfig, report: &mut ValidationReport) {
    if let Some(dir) = &config.logging.dir {
        if dir.exists() && !dir.is_dir() {
            report.error("logging.dir", format!("{} exists and is not a directory", dir.display()));
        } else if dir.ancestors().skip(1).any(|a| a.is_file()) {
            report.error("logging.dir", format!("{} sits under a regular file", dir.display()));
        }
    }
}

fn validate_replies(config: &StashConfig, report: &mut ValidationReport) {
    let replies = &config.replies;
    for (trigger, lines) in &replies.triggers {
        let path = format!("replies.triggers.{trigger}");
        if lines.is_empty() {
            report.error(&path, "Trigger has no reply lines");
        }
        if lines.len() > MAX_REPLY_LINES {
            report.error(&path, format!("At most {MAX_REPLY_LINES} reply lines are allowed"));
        }
    }
    // The elapsed-time line is appended to these.
    if replies.default_lines.len() >= MAX_REPLY_LINES {
        report.error(
            "replies.defaultLines",
            format!("At most {} lines are allowed", MAX_REPLY_LINES - 1),
        );
    }
    if let Some(model) = &replies.model_trigger {
        if replies.triggers.contains_key(model) {
            report.warn("replies.modelTrigger", "Shadowed by a canned trigger with the same text");
        }
    }
    if !replies.sticker.text.contains('$') {
        report.warn("replies.sticker.text", "No '$' placeholder; the emoji will not be shown");
    }
}
