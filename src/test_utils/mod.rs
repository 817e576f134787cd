//! Test utilities for dockcat
//!
//! Helpers shared by unit and integration tests:
//! - [`init_test_logging`] - one-time tracing setup for tests
//! - [`CatalogFixture`] - builds catalogs (features, dependencies and
//!   containers) by name, for the in-memory store or a catalog file
//!
//! # Example
//!
//! ```rust,no_run
//! use dockcat_cli::test_utils::CatalogFixture;
//!
//! let catalog = CatalogFixture::new()
//!     .feature("java", "RUN install-java", &[])
//!     .feature("maven", "RUN install-maven", &["java"])
//!     .container("web", &["maven"])
//!     .memory_catalog();
//! ```

use std::path::Path;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::Feature;
use crate::store::{CatalogData, FeatureStore, FileCatalog, MemoryCatalog};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays
/// off. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Builder for catalog contents, addressing features by name.
///
/// Dependencies and container members must be added before they are
/// referenced. Panics on unknown names, which is a bug in the test.
#[derive(Debug, Default)]
pub struct CatalogFixture {
    data: CatalogData,
}

impl CatalogFixture {
    /// Start from an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a feature with a Dockerfile fragment and dependencies.
    #[must_use]
    pub fn feature(mut self, name: &str, docker_data: &str, dependencies: &[&str]) -> Self {
        let mut feature = Feature::new(name);
        feature.docker_data = docker_data.to_string();
        feature.dependencies = dependencies.iter().filter_map(|dep| self.lookup(dep).id).collect();
        self.data.save(feature).unwrap_or_else(|e| panic!("fixture feature '{name}': {e}"));
        self
    }

    /// Attach a test snippet to an existing feature.
    #[must_use]
    pub fn test_snippet(mut self, name: &str, snippet: &str) -> Self {
        let mut feature = self.lookup(name);
        feature.test_snippet = Some(snippet.to_string());
        self.data.save(feature).unwrap_or_else(|e| panic!("fixture snippet '{name}': {e}"));
        self
    }

    /// Add a container referencing the named features.
    #[must_use]
    pub fn container(mut self, name: &str, features: &[&str]) -> Self {
        let members: Vec<Feature> = features.iter().map(|f| self.lookup(f)).collect();
        let refs: Vec<&Feature> = members.iter().collect();
        self.data.insert_container(name, &refs);
        self
    }

    /// Make `name` depend on `dependency` without any validation.
    ///
    /// Lets tests reproduce catalog files edited by hand, including cycles.
    #[must_use]
    pub fn raw_dependency(mut self, name: &str, dependency: &str) -> Self {
        let mut feature = self.lookup(name);
        if let Some(id) = self.lookup(dependency).id {
            feature.dependencies.insert(id);
        }
        self.data.save(feature).unwrap_or_else(|e| panic!("fixture edge '{name}': {e}"));
        self
    }

    /// The built catalog contents.
    #[must_use]
    pub fn build(self) -> CatalogData {
        self.data
    }

    /// An in-memory catalog holding the built contents.
    #[must_use]
    pub fn memory_catalog(self) -> MemoryCatalog {
        MemoryCatalog::with_data(self.data)
    }

    /// Write the built contents to a catalog file at `path`.
    pub fn write_to(self, path: &Path) -> FileCatalog {
        FileCatalog::store(path, &self.data)
            .unwrap_or_else(|e| panic!("failed to write fixture catalog {}: {e}", path.display()));
        FileCatalog::new(path)
    }

    fn lookup(&self, name: &str) -> Feature {
        match self.data.find_by_name(name) {
            Ok(Some(feature)) => feature,
            _ => panic!("fixture references unknown feature '{name}'"),
        }
    }
}
