//! File locking for catalog files.
//!
//! A [`CatalogLock`] serializes transactions on the same catalog file across
//! processes. The lock lives in a sibling `<catalog>.lock` file and is
//! released when the lock object is dropped.

use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::core::StoreError;

/// An exclusive lock on a catalog file.
#[derive(Debug)]
pub struct CatalogLock {
    file: File,
    path: PathBuf,
}

impl CatalogLock {
    /// Lock file path for a catalog: `dockcat.toml` -> `dockcat.toml.lock`.
    #[must_use]
    pub fn lock_path(catalog_path: &Path) -> PathBuf {
        let mut name = catalog_path.file_name().map(ToOwned::to_owned).unwrap_or_default();
        name.push(".lock");
        catalog_path.with_file_name(name)
    }

    /// Acquire an exclusive lock for `catalog_path`, blocking until it is free.
    ///
    /// # Errors
    ///
    /// [`StoreError::Lock`] if the lock file cannot be created or locked.
    pub fn acquire(catalog_path: &Path) -> Result<Self, StoreError> {
        let lock_path = Self::lock_path(catalog_path);
        let lock_error = |reason: String| StoreError::Lock {
            path: lock_path.display().to_string(),
            reason,
        };

        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                lock_error(format!("cannot create directory {}: {e}", parent.display()))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| lock_error(e.to_string()))?;

        file.lock_exclusive().map_err(|e| lock_error(e.to_string()))?;
        tracing::trace!("Acquired catalog lock {}", lock_path.display());

        Ok(Self {
            file,
            path: lock_path,
        })
    }
}

impl Drop for CatalogLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to unlock {}: {}", self.path.display(), e);
        }
    }
}
