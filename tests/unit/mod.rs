//! Unit test suite for dockcat
//!
//! Exercises the public library API without the binary: graph algorithms,
//! composition properties and service rules on the in-memory catalog.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod compose_properties;
mod graph_properties;
mod service_rules;
