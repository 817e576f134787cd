//! In-process catalog.

use std::sync::{Mutex, MutexGuard};

use super::{Catalog, CatalogData, CommitTarget, SnapshotTransaction};
use crate::core::StoreError;

/// Catalog kept in memory behind a mutex.
///
/// A transaction holds the mutex from `begin` until it is committed or
/// dropped, so transactions never interleave.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    data: Mutex<CatalogData>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with `data`.
    #[must_use]
    pub fn with_data(mut data: CatalogData) -> Self {
        data.normalize();
        Self {
            data: Mutex::new(data),
        }
    }

    #[cfg(any(test, feature = "test-utils"))]
    /// Copy of the committed contents.
    ///
    /// # Errors
    ///
    /// [`StoreError::Poisoned`] if a transaction panicked.
    pub fn snapshot(&self) -> Result<CatalogData, StoreError> {
        self.data.lock().map(|data| data.clone()).map_err(|_| StoreError::Poisoned)
    }
}

/// Publishes into the guarded catalog data.
#[derive(Debug)]
pub struct MemoryCommit<'a>(MutexGuard<'a, CatalogData>);

impl CommitTarget for MemoryCommit<'_> {
    fn publish(mut self, data: CatalogData) -> Result<(), StoreError> {
        *self.0 = data;
        Ok(())
    }
}

impl Catalog for MemoryCatalog {
    type Transaction<'a> = SnapshotTransaction<MemoryCommit<'a>>;

    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError> {
        let guard = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        tracing::trace!("Memory catalog transaction started");
        Ok(SnapshotTransaction::new((*guard).clone(), MemoryCommit(guard)))
    }
}
