//! Deletion guard and whole-catalog integrity checks.

use std::collections::{BTreeMap, BTreeSet};

use super::FeatureGraph;
use crate::core::{CatalogError, Container, Feature};

/// Decide whether `target` can be deleted.
///
/// # Errors
///
/// [`CatalogError::InUse`] listing every referencing feature and container
/// when either list is non-empty.
pub fn check_deletable(
    target: &Feature,
    referencing_features: &[Feature],
    referencing_containers: &[Container],
) -> Result<(), CatalogError> {
    if referencing_features.is_empty() && referencing_containers.is_empty() {
        return Ok(());
    }

    // One entry per referencer; hand-edited catalogs may repeat a name
    let mut by_features: Vec<String> =
        referencing_features.iter().map(|f| f.name.clone()).collect();
    by_features.sort();
    let mut by_containers: Vec<String> =
        referencing_containers.iter().map(|c| c.name.clone()).collect();
    by_containers.sort();

    Err(CatalogError::InUse {
        name: target.name.clone(),
        by_features,
        by_containers,
    })
}

/// A single problem found in a stored catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// Two or more features share a name.
    DuplicateName {
        /// The shared name
        name: String,
        /// How many features use it
        count: usize,
    },
    /// Features depend on each other in a loop.
    Cycle {
        /// Names along the cycle, first name repeated at the end
        chain: Vec<String>,
    },
    /// A feature depends on an id with no stored feature.
    DanglingDependency {
        /// The depending feature
        feature: String,
        /// The missing identifier
        missing: String,
    },
    /// A container references an id with no stored feature.
    DanglingContainerReference {
        /// The container
        container: String,
        /// The missing identifier
        missing: String,
    },
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName {
                name,
                count,
            } => write!(f, "feature name '{name}' is used by {count} features"),
            Self::Cycle {
                chain,
            } => write!(f, "circular dependency: {}", chain.join(" → ")),
            Self::DanglingDependency {
                feature,
                missing,
            } => write!(f, "feature '{feature}' depends on missing feature {missing}"),
            Self::DanglingContainerReference {
                container,
                missing,
            } => write!(f, "container '{container}' references missing feature {missing}"),
        }
    }
}

/// Check a full catalog snapshot for invariant violations.
///
/// Stores only hold valid data when every write goes through the feature
/// service; this report catches catalogs edited by hand.
#[must_use]
pub fn audit_catalog(features: &[Feature], containers: &[Container]) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    let mut name_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for feature in features {
        *name_counts.entry(feature.name.as_str()).or_default() += 1;
    }
    for (name, count) in name_counts {
        if count > 1 {
            issues.push(IntegrityIssue::DuplicateName {
                name: name.to_string(),
                count,
            });
        }
    }

    let graph = FeatureGraph::from_features(features);
    if let Some(chain) = graph.detect_cycles() {
        issues.push(IntegrityIssue::Cycle {
            chain,
        });
    }

    for (from, missing) in graph.dangling() {
        issues.push(IntegrityIssue::DanglingDependency {
            feature: graph.name(*from),
            missing: missing.to_string(),
        });
    }

    let known: BTreeSet<_> = features.iter().filter_map(|f| f.id).collect();
    for container in containers {
        for id in container.features.difference(&known) {
            issues.push(IntegrityIssue::DanglingContainerReference {
                container: container.name.clone(),
                missing: id.to_string(),
            });
        }
    }

    issues
}
