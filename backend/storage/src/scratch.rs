//! Scratch files: local buffers that exist only until their upload finishes.

use std::io;
use std::path::{Path, PathBuf};

use linestash_core::StashError;
use tempfile::{Builder, TempPath};

/// A file removed when the guard is dropped or closed.
///
/// The guard is taken before the first byte is written, so a failed write,
/// a failed upload or an early return all clean up.
#[derive(Debug)]
pub struct ScratchFile {
    path: TempPath,
}

impl ScratchFile {
    pub async fn write(path: impl Into<PathBuf>, contents: &[u8]) -> Result<Self, StashError> {
        let path = TempPath::from_path(path.into());
        tokio::fs::write(&*path, contents).await?;
        Ok(Self { path })
    }

    /// Write `contents` to a fresh uniquely named file in `dir`.
    ///
    /// Names are `{prefix}{random}{suffix}`, so concurrent callers never share a file.
    pub async fn create_in(
        dir: &Path,
        prefix: &str,
        suffix: &str,
        contents: &[u8],
    ) -> Result<Self, StashError> {
        let path = Builder::new().prefix(prefix).suffix(suffix).tempfile_in(dir)?.into_temp_path();
        tokio::fs::write(&*path, contents).await?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now, reporting a failure instead of swallowing it.
    pub fn close(self) -> io::Result<()> {
        self.path.close()
    }
}
