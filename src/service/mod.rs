//! Feature service: the operations exposed to callers.
//!
//! Every operation opens one transaction on the underlying [`Catalog`].
//! Mutations commit only when the operation succeeds and changed something;
//! on any error the transaction is dropped and the catalog is left exactly as
//! it was. Read operations never commit.
//!
//! Validation follows the resolve-then-validate pattern: dependency names are
//! looked up in bulk first so that every bad name is reported together, and
//! the cycle check runs only against features that are known to exist.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dockcat_cli::compose::ComposeOptions;
//! use dockcat_cli::core::NewFeature;
//! use dockcat_cli::service::FeatureService;
//! use dockcat_cli::store::MemoryCatalog;
//!
//! # fn main() -> Result<(), dockcat_cli::core::CatalogError> {
//! let service = FeatureService::new(MemoryCatalog::new());
//! service.create(NewFeature::named("java").docker_data("RUN install-java"))?;
//! service.create(NewFeature::named("maven").depends_on(["java"]))?;
//!
//! let artifact = service.compose(["maven"], &ComposeOptions::default())?;
//! assert_eq!(artifact.features, vec!["java", "maven"]);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use crate::compose::{self, ComposeOptions, DockerArtifact};
use crate::core::{CatalogError, Feature, FeatureSummary, FeatureUpdate, NewFeature};
use crate::graph::{
    FeatureGraph, IntegrityIssue, audit_catalog, check_acyclic, check_deletable,
    resolve_dependencies,
};
use crate::store::{Catalog, FeatureStore, StoreTransaction};

/// Outcome of a mutating operation.
enum Change<T> {
    /// The working copy was modified and must be committed
    Written(T),
    /// Nothing was modified; the transaction is discarded
    Unchanged(T),
}

/// Orchestrates catalog operations on top of a [`Catalog`].
#[derive(Debug)]
pub struct FeatureService<C: Catalog> {
    catalog: C,
}

impl<C: Catalog> FeatureService<C> {
    /// Create a service over `catalog`.
    pub const fn new(catalog: C) -> Self {
        Self {
            catalog,
        }
    }

    /// The underlying catalog.
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Run `operation` in a transaction, committing only if it succeeds and
    /// reports a [`Change::Written`].
    fn in_transaction<T, F>(&self, name: &str, operation: F) -> Result<T, CatalogError>
    where
        F: FnOnce(&mut dyn FeatureStore) -> Result<Change<T>, CatalogError>,
    {
        tracing::debug!("Begin transaction: {name}");
        let mut tx = self.catalog.begin()?;

        match operation(&mut tx) {
            Ok(Change::Written(value)) => {
                tx.commit()?;
                tracing::debug!("Committed transaction: {name}");
                Ok(value)
            }
            Ok(Change::Unchanged(value)) => {
                drop(tx);
                tracing::debug!("Discarded transaction: {name} (no changes)");
                Ok(value)
            }
            Err(e) => {
                drop(tx);
                tracing::debug!("Rolled back transaction: {name} ({e})");
                Err(e)
            }
        }
    }

    /// Run a read-only `operation`; the transaction is always discarded.
    fn read<T, F>(&self, operation: F) -> Result<T, CatalogError>
    where
        F: FnOnce(&dyn FeatureStore) -> Result<T, CatalogError>,
    {
        let tx = self.catalog.begin()?;
        operation(&tx)
    }

    /// Create a feature.
    ///
    /// Dependencies are resolved by name; no cycle check is needed because a
    /// new feature cannot be anyone's dependency yet.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::EmptyName`] when the name is blank
    /// - [`CatalogError::DuplicateName`] when the name is taken
    /// - [`CatalogError::UnresolvedNames`] listing every unknown dependency
    pub fn create(&self, new: NewFeature) -> Result<Feature, CatalogError> {
        if new.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        self.in_transaction("create", |store| {
            if store.find_by_name(&new.name)?.is_some() {
                return Err(CatalogError::DuplicateName {
                    name: new.name,
                });
            }

            let dependencies = resolve_dependencies(&*store, &new.dependencies)?;

            let mut feature = Feature::new(new.name);
            feature.docker_data = new.docker_data.unwrap_or_default();
            feature.description = new.description;
            feature.author = new.author;
            feature.test_snippet = new.test_snippet;
            feature.dependencies = dependencies.iter().filter_map(|dep| dep.id).collect();

            let saved = store.save(feature).map_err(CatalogError::from_save)?;
            tracing::info!(
                "Created feature '{}' with {} dependencies",
                saved.name,
                saved.dependencies.len()
            );
            Ok(Change::Written(saved))
        })
    }

    /// Update the feature called `name`. Fields left as `None` are unchanged.
    ///
    /// New dependency names are resolved against the catalog as it was before
    /// this update, so a feature being renamed is still found under its old
    /// name.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] when `name` does not exist
    /// - [`CatalogError::EmptyName`] when the new name is blank
    /// - [`CatalogError::DuplicateName`] when the new name belongs to another feature
    /// - [`CatalogError::UnresolvedNames`] listing every unknown dependency
    /// - [`CatalogError::CyclicDependency`] naming every dependency that would
    ///   close a cycle
    pub fn update(&self, name: &str, update: FeatureUpdate) -> Result<Feature, CatalogError> {
        self.in_transaction("update", |store| {
            let mut feature = find_existing(&*store, name)?;

            if let Some(new_name) = update.new_name.as_deref()
                && new_name != feature.name
            {
                if new_name.trim().is_empty() {
                    return Err(CatalogError::EmptyName);
                }
                if let Some(other) = store.find_by_name(new_name)?
                    && other != feature
                {
                    return Err(CatalogError::DuplicateName {
                        name: new_name.to_string(),
                    });
                }
            }

            if let Some(names) = &update.dependencies {
                let candidates = resolve_dependencies(&*store, names)?;
                let graph = FeatureGraph::from_features(&store.find_all()?);
                check_acyclic(&feature, &candidates, &graph)?;
                feature.dependencies = candidates.iter().filter_map(|dep| dep.id).collect();
            }

            if let Some(new_name) = update.new_name {
                feature.name = new_name;
            }
            if let Some(docker_data) = update.docker_data {
                feature.docker_data = docker_data;
            }
            if let Some(description) = update.description {
                feature.description = Some(description);
            }
            if let Some(author) = update.author {
                feature.author = Some(author);
            }
            if let Some(test_snippet) = update.test_snippet {
                feature.test_snippet = Some(test_snippet);
            }

            let saved = store.save(feature).map_err(CatalogError::from_save)?;
            tracing::info!("Updated feature '{}'", saved.name);
            Ok(Change::Written(saved))
        })
    }

    /// Look a feature up by exact name.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] when absent.
    pub fn get(&self, name: &str) -> Result<Feature, CatalogError> {
        self.read(|store| find_existing(store, name))
    }

    /// Features whose name contains `filter`, case-insensitively, sorted by
    /// name. An empty filter lists the whole catalog.
    pub fn list(&self, filter: &str) -> Result<Vec<Feature>, CatalogError> {
        self.read(|store| Ok(store.find_by_name_containing(filter, true)?))
    }

    /// Every feature name in the catalog, sorted.
    pub fn names(&self) -> Result<Vec<String>, CatalogError> {
        self.read(|store| {
            let mut names: Vec<String> =
                store.find_all()?.into_iter().map(|feature| feature.name).collect();
            names.sort();
            Ok(names)
        })
    }

    /// Delete the feature called `name`.
    ///
    /// Returns `Ok(false)` without touching the catalog when no such feature
    /// exists, and `Ok(true)` once it has been removed.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InUse`] listing every feature and container that still
    /// references it.
    pub fn delete(&self, name: &str) -> Result<bool, CatalogError> {
        self.in_transaction("delete", |store| {
            let Some(feature) = store.find_by_name(name)? else {
                tracing::debug!("Feature '{name}' does not exist, nothing to delete");
                return Ok(Change::Unchanged(false));
            };

            let by_features = store.find_referencing_features(&feature)?;
            let by_containers = store.find_referencing_containers(&feature)?;
            if let Err(e) = check_deletable(&feature, &by_features, &by_containers) {
                tracing::warn!("{e}");
                return Err(e);
            }

            store.delete(&feature)?;
            tracing::info!("Deleted feature '{name}'");
            Ok(Change::Written(true))
        })
    }

    /// Compose the named features and their transitive dependencies.
    ///
    /// # Errors
    ///
    /// See [`compose::compose`].
    pub fn compose<I>(
        &self,
        names: I,
        options: &ComposeOptions,
    ) -> Result<DockerArtifact, CatalogError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.read(|store| compose::compose(store, names, options))
    }

    /// Read views of `features` with dependency ids replaced by names.
    pub fn summaries(&self, features: &[Feature]) -> Result<Vec<FeatureSummary>, CatalogError> {
        self.read(|store| summarize(store, features))
    }

    /// Read view of the feature called `name`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] when absent.
    pub fn summary(&self, name: &str) -> Result<FeatureSummary, CatalogError> {
        self.read(|store| {
            let feature = find_existing(store, name)?;
            let summaries = summarize(store, std::slice::from_ref(&feature))?;
            summaries.into_iter().next().ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
            })
        })
    }

    /// Audit the whole catalog for problems that validation would normally
    /// prevent, such as cycles introduced by editing the catalog file by hand.
    pub fn check(&self) -> Result<CatalogAudit, CatalogError> {
        self.read(|store| {
            let features = store.find_all()?;
            let containers = store.find_containers()?;
            Ok(CatalogAudit {
                issues: audit_catalog(&features, &containers),
                feature_count: features.len(),
            })
        })
    }
}

/// Result of [`FeatureService::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogAudit {
    /// Problems found, empty for a consistent catalog
    pub issues: Vec<IntegrityIssue>,
    /// Number of stored features
    pub feature_count: usize,
}

impl CatalogAudit {
    /// Returns `true` when no problems were found.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

fn summarize(
    store: &dyn FeatureStore,
    features: &[Feature],
) -> Result<Vec<FeatureSummary>, CatalogError> {
    let all = store.find_all()?;
    let names: HashMap<_, _> = all
        .iter()
        .filter_map(|feature| feature.id.map(|id| (id, feature.name.as_str())))
        .collect();

    Ok(features
        .iter()
        .map(|feature| {
            let mut dependencies: Vec<String> = feature
                .dependencies
                .iter()
                .map(|id| names.get(id).map_or_else(|| id.to_string(), ToString::to_string))
                .collect();
            dependencies.sort();
            FeatureSummary {
                name: feature.name.clone(),
                description: feature.description.clone(),
                author: feature.author.clone(),
                docker_data: feature.docker_data.clone(),
                test_snippet: feature.test_snippet.clone(),
                updated_at: feature.updated_at,
                dependencies,
            }
        })
        .collect())
}

fn find_existing(store: &dyn FeatureStore, name: &str) -> Result<Feature, CatalogError> {
    store.find_by_name(name)?.ok_or_else(|| CatalogError::NotFound {
        name: name.to_string(),
    })
}
