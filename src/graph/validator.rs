//! Dependency-list validation.
//!
//! Validation runs in two phases. [`resolve_dependencies`] looks every
//! requested name up in one pass and reports all names that failed to
//! resolve. [`check_acyclic`] then walks the stored graph to find every
//! candidate that would close a cycle. Creation only needs the first phase:
//! a feature that does not exist yet cannot be anyone's dependency.

use std::collections::BTreeSet;
use strsim::levenshtein;

use super::FeatureGraph;
use crate::core::{CatalogError, Feature};
use crate::store::FeatureStore;

/// Maximum allowed Levenshtein distance as a percentage of the name length
/// for "did you mean" suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Resolve dependency names to stored features.
///
/// Names are deduplicated by exact, case-sensitive match before lookup. The
/// resolved features are returned sorted by name.
///
/// # Errors
///
/// [`CatalogError::UnresolvedNames`] listing every name with no stored
/// feature, or [`CatalogError::Storage`] when a lookup fails.
pub fn resolve_dependencies<S, I>(store: &S, names: I) -> Result<Vec<Feature>, CatalogError>
where
    S: FeatureStore + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let unique: BTreeSet<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();

    let mut resolved = Vec::with_capacity(unique.len());
    let mut missing = Vec::new();
    for name in unique {
        match store.find_by_name(&name)? {
            Some(feature) => resolved.push(feature),
            None => missing.push(name),
        }
    }

    if !missing.is_empty() {
        tracing::debug!("Unresolved dependency names: {missing:?}");
        return Err(CatalogError::UnresolvedNames {
            missing,
        });
    }

    Ok(resolved)
}

/// Check that making `subject` depend on `candidates` keeps the graph acyclic.
///
/// `graph` must reflect the currently stored catalog. Only the new edges out
/// of `subject` are examined: a candidate closes a cycle when `subject` is
/// reachable from it, or when it is `subject` itself.
///
/// # Errors
///
/// [`CatalogError::CyclicDependency`] naming every offending candidate.
pub fn check_acyclic(
    subject: &Feature,
    candidates: &[Feature],
    graph: &FeatureGraph,
) -> Result<(), CatalogError> {
    let Some(subject_id) = subject.id else {
        return Ok(());
    };

    let offenders: BTreeSet<String> = candidates
        .iter()
        .filter(|candidate| candidate.id.is_some_and(|id| graph.reaches(id, subject_id)))
        .map(|candidate| candidate.name.clone())
        .collect();

    if offenders.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::CyclicDependency {
            feature: subject.name.clone(),
            offenders: offenders.into_iter().collect(),
        })
    }
}

/// Find up to three catalog names close to `target`, closest first.
#[must_use]
pub fn similar_names(target: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<_> = available
        .iter()
        .filter(|name| name.as_str() != target)
        .map(|name| (name.clone(), levenshtein(target, name)))
        .collect();

    scored.sort_by(|(a_name, a_dist), (b_name, b_dist)| {
        a_dist.cmp(b_dist).then_with(|| a_name.cmp(b_name))
    });

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(name, _)| name)
        .collect()
}
