//! Core types and error handling for dockcat
//!
//! - [`error`] - [`CatalogError`], [`StoreError`] and the CLI error context
//! - [`feature`] - [`Feature`], [`Container`] and the create/update inputs

pub mod error;
pub mod feature;

pub use error::{CatalogError, ErrorContext, StoreError, user_friendly_error};
pub use feature::{
    Container, ContainerId, Feature, FeatureId, FeatureSummary, FeatureUpdate, NewFeature,
};
