//! Catalog entities: features and the containers that reference them.
//!
//! Dependencies are stored as a set of [`FeatureId`]s rather than as nested
//! feature values, so the dependency relation is a plain adjacency structure
//! that can be traversed, serialized and compared without ownership cycles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Persistent identifier of a feature, assigned by the store on first save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Persistent identifier of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub u64);

/// A reusable Dockerfile fragment with dependencies on other features.
///
/// Equality is identity: two features are equal when both have been saved
/// and carry the same [`FeatureId`]. Field values are not compared, and an
/// unsaved feature is not equal to anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Store-assigned identifier, `None` until first saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    /// Unique feature name
    pub name: String,
    /// Dockerfile fragment contributed by this feature
    #[serde(default)]
    pub docker_data: String,
    /// Test script fragment run against images built with this feature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_snippet: Option<String>,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Who last authored the feature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Set by the store on every save
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    /// Identifiers of the features this one depends on
    #[serde(default)]
    pub dependencies: BTreeSet<FeatureId>,
}

impl Feature {
    /// Creates an unsaved feature with an empty fragment and no dependencies.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            docker_data: String::new(),
            test_snippet: None,
            description: None,
            author: None,
            updated_at: Utc::now(),
            dependencies: BTreeSet::new(),
        }
    }

    /// Returns `true` when this feature lists `other` as a direct dependency.
    #[must_use]
    pub fn depends_on(&self, other: &Self) -> bool {
        other.id.is_some_and(|id| self.dependencies.contains(&id))
    }
}

impl PartialEq for Feature {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// A higher-level image definition composed of features.
///
/// dockcat never creates or edits containers; they exist so that a feature
/// used by a container cannot be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    /// Store-assigned identifier
    pub id: ContainerId,
    /// Container name
    pub name: String,
    /// Features the container is built from
    #[serde(default)]
    pub features: BTreeSet<FeatureId>,
}

impl Container {
    /// Returns `true` when the container references `feature`.
    #[must_use]
    pub fn references(&self, feature: &Feature) -> bool {
        feature.id.is_some_and(|id| self.features.contains(&id))
    }
}

/// Input for creating a feature.
#[derive(Debug, Clone, Default)]
pub struct NewFeature {
    /// Feature name, must not be blank
    pub name: String,
    /// Dockerfile fragment, defaults to empty
    pub docker_data: Option<String>,
    /// Names of the features this one depends on
    pub dependencies: Vec<String>,
    /// Optional description
    pub description: Option<String>,
    /// Optional author
    pub author: Option<String>,
    /// Optional test fragment
    pub test_snippet: Option<String>,
}

impl NewFeature {
    /// Starts a draft with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the Dockerfile fragment.
    #[must_use]
    pub fn docker_data(mut self, data: impl Into<String>) -> Self {
        self.docker_data = Some(data.into());
        self
    }

    /// Sets the dependency names.
    #[must_use]
    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update of a feature; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct FeatureUpdate {
    /// Rename the feature
    pub new_name: Option<String>,
    /// Replace the Dockerfile fragment
    pub docker_data: Option<String>,
    /// Replace the dependency set with these names
    pub dependencies: Option<Vec<String>>,
    /// Replace the description
    pub description: Option<String>,
    /// Replace the author
    pub author: Option<String>,
    /// Replace the test fragment
    pub test_snippet: Option<String>,
}

impl FeatureUpdate {
    /// Returns `true` when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.new_name.is_none()
            && self.docker_data.is_none()
            && self.dependencies.is_none()
            && self.description.is_none()
            && self.author.is_none()
            && self.test_snippet.is_none()
    }
}

/// Read view of a feature with dependencies listed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSummary {
    /// Feature name
    pub name: String,
    /// Description, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Dockerfile fragment
    pub docker_data: String,
    /// Test fragment, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_snippet: Option<String>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Dependency names, sorted
    pub dependencies: Vec<String>,
}
