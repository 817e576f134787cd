//! TOML-file catalog.
//!
//! The catalog lives in a single TOML document (see [`CatalogData`]). Each
//! transaction locks the file, reads it into a working copy and, on commit,
//! rewrites it atomically. A transaction that is dropped leaves the file
//! untouched.

use std::path::{Path, PathBuf};

use super::{Catalog, CatalogData, CatalogLock, CommitTarget, SnapshotTransaction};
use crate::core::StoreError;
use crate::utils::fs::atomic_write;

/// Default catalog file name.
pub const DEFAULT_CATALOG_FILE: &str = "dockcat.toml";

/// Catalog persisted in a TOML file.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    /// Open the catalog at `path`. The file is created on the first commit.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Location of the catalog file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the catalog file, or an empty catalog if it does not exist.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] on read failure, [`StoreError::Parse`] on invalid TOML.
    pub fn load(path: &Path) -> Result<CatalogData, StoreError> {
        if !path.exists() {
            return Ok(CatalogData::default());
        }

        let content = std::fs::read_to_string(path)?;
        let mut data: CatalogData = toml::from_str(&content).map_err(|e| StoreError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        data.normalize();
        Ok(data)
    }

    /// Serialize `data` and atomically replace the catalog file.
    ///
    /// # Errors
    ///
    /// [`StoreError::Serialize`] or [`StoreError::Io`].
    pub fn store(path: &Path, data: &CatalogData) -> Result<(), StoreError> {
        let content = toml::to_string_pretty(data)?;
        atomic_write(path, content.as_bytes()).map_err(|e| {
            StoreError::Io(std::io::Error::other(format!("{e:#}")))
        })
    }
}

/// Writes the working copy back to the catalog file while holding its lock.
#[derive(Debug)]
pub struct FileCommit {
    path: PathBuf,
    _lock: CatalogLock,
}

impl CommitTarget for FileCommit {
    fn publish(self, data: CatalogData) -> Result<(), StoreError> {
        FileCatalog::store(&self.path, &data)?;
        tracing::debug!("Wrote catalog {}", self.path.display());
        Ok(())
    }
}

impl Catalog for FileCatalog {
    type Transaction<'a> = SnapshotTransaction<FileCommit>;

    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError> {
        let lock = CatalogLock::acquire(&self.path)?;
        let data = Self::load(&self.path)?;
        Ok(SnapshotTransaction::new(
            data,
            FileCommit {
                path: self.path.clone(),
                _lock: lock,
            },
        ))
    }
}
