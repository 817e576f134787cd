//! Composition of catalog features into a Dockerfile.
//!
//! Composing a request takes three steps:
//!
//! 1. The requested names are resolved in bulk, failing with every unknown
//!    name at once.
//! 2. The transitive dependency closure is collected from a graph snapshot
//!    of the catalog. Shared dependencies (diamonds) are visited once.
//! 3. The closure is ordered so that each feature follows all of its
//!    dependencies, with ties broken by name, and rendered.
//!
//! The result does not depend on the order in which names were requested.

mod dockerfile;

pub use dockerfile::{render_dockerfile, render_test_script};

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::core::{CatalogError, Feature, FeatureId};
use crate::graph::{FeatureGraph, resolve_dependencies};
use crate::store::FeatureStore;

/// Options controlling how an artifact is rendered.
#[derive(Debug, Clone, Default)]
pub struct ComposeOptions {
    /// Image for the leading `FROM` line; no header when `None`
    pub base_image: Option<String>,
}

/// A composed Dockerfile together with its test script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockerArtifact {
    /// Rendered Dockerfile text
    pub dockerfile: String,
    /// Rendered test script, `None` when no composed feature has a test snippet
    pub test_script: Option<String>,
    /// Names of the composed features in build order
    pub features: Vec<String>,
}

impl DockerArtifact {
    /// Returns `true` when no feature was composed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Compose the requested features and everything they depend on.
///
/// # Errors
///
/// - [`CatalogError::UnresolvedNames`] when any requested name is unknown
/// - [`CatalogError::CyclicDependency`] when the stored graph contains a
///   cycle within the closure
/// - [`CatalogError::Storage`] when the store fails
pub fn compose<S, I>(
    store: &S,
    names: I,
    options: &ComposeOptions,
) -> Result<DockerArtifact, CatalogError>
where
    S: FeatureStore + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let requested = resolve_dependencies(store, names)?;
    let all = store.find_all()?;
    let graph = FeatureGraph::from_features(&all);

    let closure = graph.closure(requested.iter().filter_map(|feature| feature.id));
    let order = order_closure(&graph, &closure)?;

    let by_id: HashMap<FeatureId, &Feature> =
        all.iter().filter_map(|feature| feature.id.map(|id| (id, feature))).collect();
    let ordered: Vec<&Feature> = order.iter().filter_map(|id| by_id.get(id).copied()).collect();

    tracing::debug!(
        "Composing {} feature(s) from {} requested",
        ordered.len(),
        requested.len()
    );

    Ok(DockerArtifact {
        dockerfile: render_dockerfile(options.base_image.as_deref(), &ordered),
        test_script: render_test_script(&ordered),
        features: ordered.iter().map(|feature| feature.name.clone()).collect(),
    })
}

fn order_closure(
    graph: &FeatureGraph,
    closure: &BTreeSet<FeatureId>,
) -> Result<Vec<FeatureId>, CatalogError> {
    graph.topological_order(closure).map_err(|stuck| {
        let mut offenders: Vec<String> = stuck.iter().map(|id| graph.name(*id)).collect();
        offenders.sort();
        CatalogError::CyclicDependency {
            feature: offenders.first().cloned().unwrap_or_default(),
            offenders,
        }
    })
}
