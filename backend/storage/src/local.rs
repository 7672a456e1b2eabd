//! Filesystem backend with the same key layout as the bucket.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use linestash_core::{ObjectStore, StashError};
use tokio::fs;
use tracing::debug;

pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StashError> {
        let relative = Path::new(key);
        let escapes = relative.components().any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(StashError::UploadFailed {
                key: key.to_string(),
                reason: "key must be a relative path without '..'".into(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalDirStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: Option<&str>,
    ) -> Result<(), StashError> {
        let target = self.object_path(key)?;
        let failed = |e: std::io::Error| StashError::UploadFailed {
            key: key.to_string(),
            reason: e.to_string(),
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(failed)?;
        }
        fs::copy(local_path, &target).await.map_err(failed)?;
        debug!(path = %target.display(), content_type, "Stored object locally");
        Ok(())
    }
}
