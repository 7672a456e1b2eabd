//! Raw webhook payload logging.
//!
//! Each request body is written to its own scratch file and uploaded as a
//! `{prefix}{stamp}.log` object.

use std::path::PathBuf;
use std::sync::Arc;

use linestash_core::{artifact_stamp, log_key, Clock, ObjectStore, StashError};
use tracing::{debug, warn};

use crate::scratch::ScratchFile;

pub const LOG_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub struct EventLogger {
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
    scratch_dir: PathBuf,
    prefix: String,
}

impl EventLogger {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
        scratch_dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self { store, clock, scratch_dir: scratch_dir.into(), prefix: prefix.into() }
    }

    /// Upload `body` plus a trailing newline and return the object key.
    pub async fn record(&self, body: &str) -> Result<String, StashError> {
        let stamp = artifact_stamp(self.clock.now());
        let key = log_key(&self.prefix, &stamp);

        let contents = format!("{body}\n");
        let scratch =
            ScratchFile::create_in(&self.scratch_dir, "events-", ".log", contents.as_bytes()).await?;

        self.store.upload(scratch.path(), &key, Some(LOG_CONTENT_TYPE)).await?;

        if let Err(e) = scratch.close() {
            warn!(error = %e, "Failed to remove log scratch file");
        }
        debug!(key = %key, store = self.store.name(), bytes = body.len() + 1, "Recorded webhook payload");
        Ok(key)
    }
}
