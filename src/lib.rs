//! dockcat - feature catalog and Dockerfile composer
//!
//! dockcat keeps a catalog of *features*: reusable Dockerfile fragments that
//! may depend on other features. The catalog is a directed acyclic graph, and
//! any set of features can be composed, together with everything they depend
//! on, into a single Dockerfile in dependency order.
//!
//! # Architecture Overview
//!
//! - [`core`] - the catalog entities and the error taxonomy
//! - [`graph`] - dependency graph, bulk name resolution, cycle prevention and
//!   deletion guard
//! - [`compose`] - transitive closure, deterministic ordering and rendering
//! - [`store`] - transactional storage: an in-memory catalog and a locked
//!   TOML catalog file
//! - [`service`] - the operations: create, update, get, list, delete,
//!   compose and check, each in one transaction
//! - [`config`] - user configuration (`~/.dockcat/config.toml`)
//! - [`cli`] - the `dockcat` command line
//!
//! # Integrity Rules
//!
//! - Feature names are unique.
//! - The dependency relation never contains a cycle.
//! - A feature that another feature depends on, or that a container
//!   references, cannot be deleted.
//!
//! Every rule is checked before anything is written, and a failed operation
//! leaves the catalog untouched.

pub mod cli;
pub mod compose;
pub mod config;
pub mod core;
pub mod graph;
pub mod service;
pub mod store;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
