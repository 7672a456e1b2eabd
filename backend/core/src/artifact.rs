//! Object keys for stored artifacts.

use chrono::{DateTime, Utc};

use crate::event::MediaKind;

/// Microsecond resolution keeps rapid sequential events from colliding.
pub const ARTIFACT_STAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%6f";

pub fn artifact_stamp(now: DateTime<Utc>) -> String {
    now.format(ARTIFACT_STAMP_FORMAT).to_string()
}

/// `{sourceIdentity}-{stamp}.{ext}`
pub fn media_file_name(source_id: &str, stamp: &str, kind: MediaKind) -> String {
    format!("{source_id}-{stamp}.{}", kind.extension())
}

/// `{ext}/{sourceIdentity}-{stamp}.{ext}`
pub fn media_key(source_id: &str, stamp: &str, kind: MediaKind) -> String {
    format!("{}/{}", kind.extension(), media_file_name(source_id, stamp, kind))
}

/// `{prefix}{stamp}.log`
pub fn log_key(prefix: &str, stamp: &str) -> String {
    format!("{prefix}{stamp}.log")
}
