//! In-memory catalog contents and the copy-on-begin transaction.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{FeatureStore, StoreTransaction};
use crate::core::{Container, ContainerId, Feature, FeatureId, StoreError};

/// Full contents of a catalog: features, containers and id counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    /// Next id handed to a new feature
    #[serde(default)]
    pub next_feature_id: u64,
    /// Next id handed to a new container
    #[serde(default)]
    pub next_container_id: u64,
    /// Stored features
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Stored containers
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl CatalogData {
    /// Repair id counters so they never hand out an id already in use.
    ///
    /// Catalog files edited by hand may carry stale counters.
    pub fn normalize(&mut self) {
        let max_feature = self.features.iter().filter_map(|f| f.id).map(|id| id.0).max();
        self.next_feature_id = self.next_feature_id.max(max_feature.map_or(1, |max| max + 1));

        let max_container = self.containers.iter().map(|c| c.id.0).max();
        self.next_container_id =
            self.next_container_id.max(max_container.map_or(1, |max| max + 1));
    }

    fn allocate_feature_id(&mut self) -> FeatureId {
        self.normalize();
        let id = FeatureId(self.next_feature_id);
        self.next_feature_id += 1;
        id
    }

    /// Register a container referencing `features`.
    ///
    /// Containers are managed outside dockcat; this exists to seed catalogs.
    pub fn insert_container(&mut self, name: impl Into<String>, features: &[&Feature]) -> Container {
        self.normalize();
        let container = Container {
            id: ContainerId(self.next_container_id),
            name: name.into(),
            features: features.iter().filter_map(|f| f.id).collect::<BTreeSet<_>>(),
        };
        self.next_container_id += 1;
        self.containers.push(container.clone());
        container
    }
}

impl FeatureStore for CatalogData {
    fn find_by_name(&self, name: &str) -> Result<Option<Feature>, StoreError> {
        Ok(self.features.iter().find(|f| f.name == name).cloned())
    }

    fn find_by_name_containing(
        &self,
        fragment: &str,
        case_insensitive: bool,
    ) -> Result<Vec<Feature>, StoreError> {
        let needle = if case_insensitive {
            fragment.to_lowercase()
        } else {
            fragment.to_string()
        };

        let mut found: Vec<Feature> = self
            .features
            .iter()
            .filter(|f| {
                if case_insensitive {
                    f.name.to_lowercase().contains(&needle)
                } else {
                    f.name.contains(&needle)
                }
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn find_all(&self) -> Result<Vec<Feature>, StoreError> {
        let mut all = self.features.clone();
        all.sort_by_key(|f| f.id);
        Ok(all)
    }

    fn find_containers(&self) -> Result<Vec<Container>, StoreError> {
        let mut all = self.containers.clone();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }

    fn find_referencing_features(&self, target: &Feature) -> Result<Vec<Feature>, StoreError> {
        Ok(self.features.iter().filter(|f| f.depends_on(target)).cloned().collect())
    }

    fn find_referencing_containers(&self, target: &Feature) -> Result<Vec<Container>, StoreError> {
        Ok(self.containers.iter().filter(|c| c.references(target)).cloned().collect())
    }

    fn save(&mut self, mut feature: Feature) -> Result<Feature, StoreError> {
        let collides = self
            .features
            .iter()
            .any(|f| f.name == feature.name && (feature.id.is_none() || f.id != feature.id));
        if collides {
            return Err(StoreError::UniqueViolation {
                name: feature.name,
            });
        }

        feature.updated_at = Utc::now();

        let existing = feature
            .id
            .and_then(|id| self.features.iter_mut().find(|f| f.id == Some(id)));
        match existing {
            Some(slot) => *slot = feature.clone(),
            None => {
                if feature.id.is_none() {
                    feature.id = Some(self.allocate_feature_id());
                }
                self.features.push(feature.clone());
            }
        }

        Ok(feature)
    }

    fn delete(&mut self, feature: &Feature) -> Result<(), StoreError> {
        if let Some(id) = feature.id {
            self.features.retain(|f| f.id != Some(id));
        }
        Ok(())
    }
}

/// Where a committed working copy is published.
pub trait CommitTarget {
    /// Replace the catalog contents with `data`.
    fn publish(self, data: CatalogData) -> Result<(), StoreError>;
}

/// Transaction working on a private copy of the catalog.
///
/// The copy is taken when the transaction starts. Commit hands it to the
/// [`CommitTarget`]; dropping the transaction throws it away.
#[derive(Debug)]
pub struct SnapshotTransaction<T: CommitTarget> {
    working: CatalogData,
    target: T,
}

impl<T: CommitTarget> SnapshotTransaction<T> {
    /// Start a transaction over `working`, publishing to `target` on commit.
    pub const fn new(working: CatalogData, target: T) -> Self {
        Self {
            working,
            target,
        }
    }

    #[cfg(any(test, feature = "test-utils"))]
    /// The working copy, including uncommitted changes.
    #[must_use]
    pub const fn data(&self) -> &CatalogData {
        &self.working
    }
}

impl<T: CommitTarget> FeatureStore for SnapshotTransaction<T> {
    fn find_by_name(&self, name: &str) -> Result<Option<Feature>, StoreError> {
        self.working.find_by_name(name)
    }

    fn find_by_name_containing(
        &self,
        fragment: &str,
        case_insensitive: bool,
    ) -> Result<Vec<Feature>, StoreError> {
        self.working.find_by_name_containing(fragment, case_insensitive)
    }

    fn find_all(&self) -> Result<Vec<Feature>, StoreError> {
        self.working.find_all()
    }

    fn find_containers(&self) -> Result<Vec<Container>, StoreError> {
        self.working.find_containers()
    }

    fn find_referencing_features(&self, target: &Feature) -> Result<Vec<Feature>, StoreError> {
        self.working.find_referencing_features(target)
    }

    fn find_referencing_containers(&self, target: &Feature) -> Result<Vec<Container>, StoreError> {
        self.working.find_referencing_containers(target)
    }

    fn save(&mut self, feature: Feature) -> Result<Feature, StoreError> {
        self.working.save(feature)
    }

    fn delete(&mut self, feature: &Feature) -> Result<(), StoreError> {
        self.working.delete(feature)
    }
}

impl<T: CommitTarget> StoreTransaction for SnapshotTransaction<T> {
    fn commit(self) -> Result<(), StoreError> {
        self.target.publish(self.working)
    }
}
