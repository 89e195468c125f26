// file: src/pipeline/scratch.rs
// description: per-run scratch directory for downloaded documents
// reference: https://docs.rs/tempfile

use crate::error::{PipelineError, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tracing::debug;

/// Removed on `release` or on drop, whichever comes first.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
    next_index: AtomicUsize,
}

impl ScratchDir {
    pub fn create(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ioc_harvest-");

        let dir = match root {
            Some(root) => {
                fs::create_dir_all(root).map_err(|e| {
                    PipelineError::Resource(format!(
                        "cannot create scratch root {}: {}",
                        root.display(),
                        e
                    ))
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| PipelineError::Resource(format!("cannot create scratch directory: {}", e)))?;

        debug!("Created scratch directory {}", dir.path().display());
        Ok(Self {
            dir,
            next_index: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A fresh file path for the body behind `url`. Repeated URLs get distinct paths.
    pub fn allocate(&self, url: &str) -> PathBuf {
        let index = self.next_index.fetch_add(1, Ordering::SeqCst);
        let digest = format!("{:x}", Sha256::digest(url.as_bytes()));
        self.dir
            .path()
            .join(format!("{:04}-{}.pdf", index, &digest[..16]))
    }

    pub fn release(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| PipelineError::file(&path, e))?;
        debug!("Released scratch directory {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_removes_directory() {
        let scratch = ScratchDir::create(None).unwrap();
        let path = scratch.path().to_path_buf();
        fs::write(scratch.allocate("https://a.example/x.pdf"), b"x").unwrap();

        scratch.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let path = {
            let scratch = ScratchDir::create(None).unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_allocate_is_unique_per_call() {
        let scratch = ScratchDir::create(None).unwrap();
        let first = scratch.allocate("https://a.example/x.pdf");
        let second = scratch.allocate("https://a.example/x.pdf");

        assert_ne!(first, second);
        assert!(first.starts_with(scratch.path()));
        assert_eq!(first.extension().unwrap(), "pdf");
    }

    #[test]
    fn test_custom_root() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchDir::create(Some(&root.path().join("nested"))).unwrap();
        assert!(scratch.path().starts_with(root.path()));
    }

    #[test]
    fn test_unwritable_root_is_resource_error() {
        let root = TempDir::new().unwrap();
        let blocker = root.path().join("file");
        fs::write(&blocker, b"not a dir").unwrap();

        let err = ScratchDir::create(Some(&blocker.join("sub"))).unwrap_err();
        assert!(matches!(err, PipelineError::Resource(_)));
    }
}
