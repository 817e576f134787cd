//! Feature storage.
//!
//! The service never talks to storage directly; it opens a transaction via
//! [`Catalog::begin`] and works against the [`FeatureStore`] view that the
//! transaction implements. Work becomes visible only after
//! [`StoreTransaction::commit`]; dropping a transaction discards it.
//!
//! Two catalogs are provided:
//! - [`MemoryCatalog`] - in-process catalog guarded by a mutex
//! - [`FileCatalog`] - TOML catalog file guarded by an exclusive file lock

mod file;
mod lock;
mod memory;
mod snapshot;

pub use file::{DEFAULT_CATALOG_FILE, FileCatalog, FileCommit};
pub use lock::CatalogLock;
pub use memory::{MemoryCatalog, MemoryCommit};
pub use snapshot::{CatalogData, CommitTarget, SnapshotTransaction};

use crate::core::{Container, Feature, StoreError};

/// Repository operations over features and the containers referencing them.
pub trait FeatureStore {
    /// Find a feature by exact, case-sensitive name.
    fn find_by_name(&self, name: &str) -> Result<Option<Feature>, StoreError>;

    /// Find features whose name contains `fragment`, sorted by name.
    fn find_by_name_containing(
        &self,
        fragment: &str,
        case_insensitive: bool,
    ) -> Result<Vec<Feature>, StoreError>;

    /// Every stored feature, sorted by id.
    fn find_all(&self) -> Result<Vec<Feature>, StoreError>;

    /// Every stored container, sorted by id.
    fn find_containers(&self) -> Result<Vec<Container>, StoreError>;

    /// Features whose dependency set contains `target`.
    fn find_referencing_features(&self, target: &Feature) -> Result<Vec<Feature>, StoreError>;

    /// Containers that reference `target`.
    fn find_referencing_containers(&self, target: &Feature) -> Result<Vec<Container>, StoreError>;

    /// Insert or update a feature.
    ///
    /// Assigns an id to unsaved features and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// [`StoreError::UniqueViolation`] if another feature has the same name.
    fn save(&mut self, feature: Feature) -> Result<Feature, StoreError>;

    /// Remove a feature. Removing an unknown feature is a no-op.
    fn delete(&mut self, feature: &Feature) -> Result<(), StoreError>;
}

/// A unit of work over a catalog.
pub trait StoreTransaction: FeatureStore {
    /// Publish every change made through this transaction.
    fn commit(self) -> Result<(), StoreError>;
}

/// A catalog that hands out isolated transactions.
pub trait Catalog {
    /// Transaction type borrowing the catalog.
    type Transaction<'a>: StoreTransaction
    where
        Self: 'a;

    /// Start a transaction. Transactions on the same catalog are serialized.
    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError>;
}
