//! Object storage for linestash.
//!
//! `S3Store` is the production backend; `LocalDirStore` mirrors the same key
//! layout on disk. Uploads always go through a `ScratchFile` so the local copy
//! is removed on every exit path.

pub mod event_log;
pub mod local;
pub mod s3;
pub mod scratch;

pub use event_log::{EventLogger, LOG_CONTENT_TYPE};
pub use local::LocalDirStore;
pub use s3::S3Store;
pub use scratch::ScratchFile;

use std::sync::Arc;

use linestash_config::{StorageBackend, StorageConfig};
use linestash_core::{ObjectStore, StashError};

/// Build the configured object store backend.
pub async fn build_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StashError> {
    match config.backend {
        StorageBackend::S3 => Ok(Arc::new(S3Store::from_config(config).await?)),
        StorageBackend::Local => {
            let root = config.local_dir.clone().ok_or_else(|| {
                StashError::Config("storage.localDir is required for the local backend".into())
            })?;
            Ok(Arc::new(LocalDirStore::new(root)))
        }
    }
}
