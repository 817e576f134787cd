//! Integration test suite for dockcat
//!
//! End-to-end tests that run the `dockcat` binary against catalog files in
//! temporary directories, plus service workflows over the file-backed catalog.
//!
//! # Test Organization
//!
//! - **cli_workflow**: create, update, show, list, delete and compose through the CLI
//! - **cli_errors**: validation failures, exit codes and error output
//! - **config**: configuration file and catalog path precedence
//! - **file_catalog**: transactions, rollback and locking on catalog files
//!
//! ```bash
//! cargo test --test integration
//! ```

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli_errors;
mod config;
