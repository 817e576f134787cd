//! Graph-integrity engine for the feature catalog.
//!
//! - [`dependency_graph`] - adjacency graph over feature ids with closure,
//!   ordering and cycle detection
//! - [`validator`] - bulk dependency-name resolution and cycle prevention
//! - [`integrity`] - deletion guard and catalog audit
//!
//! Everything here is pure in-memory logic. Store access is limited to the
//! name lookups performed by [`validator::resolve_dependencies`].

pub mod dependency_graph;
pub mod integrity;
pub mod validator;

pub use dependency_graph::FeatureGraph;
pub use integrity::{IntegrityIssue, audit_catalog, check_deletable};
pub use validator::{check_acyclic, resolve_dependencies, similar_names};
