//! Error handling for dockcat
//!
//! Errors are split into two families:
//! - [`CatalogError`] - the caller-facing validation taxonomy (empty names,
//!   duplicates, unresolved dependencies, cycles, blocked deletions) plus a
//!   single [`CatalogError::Storage`] variant for infrastructure failures
//! - [`StoreError`] - failures raised by a [`crate::store::FeatureStore`]
//!
//! Validation errors always carry the complete set of offenders so callers
//! can report every bad name at once.
//!
//! At the CLI boundary errors travel as [`anyhow::Error`] and are turned into
//! an [`ErrorContext`] by [`user_friendly_error`], which adds details and an
//! actionable suggestion before printing.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dockcat_cli::core::{CatalogError, user_friendly_error};
//!
//! let error = CatalogError::NotFound {
//!     name: "python".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Validation and infrastructure failures reported by the feature service.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Feature name was empty or whitespace only.
    #[error("Feature name is empty")]
    EmptyName,

    /// Another feature already uses this name.
    #[error("Feature with name '{name}' already exists")]
    DuplicateName {
        /// The colliding name
        name: String,
    },

    /// No feature with this name exists.
    #[error("Feature with name '{name}' is not found")]
    NotFound {
        /// The requested name
        name: String,
    },

    /// One or more dependency names did not resolve to stored features.
    #[error("Failed to find features with names: {}", .missing.join(", "))]
    UnresolvedNames {
        /// Every name that failed to resolve, sorted
        missing: Vec<String>,
    },

    /// Attaching the candidate dependencies would close a cycle.
    #[error("Recursive dependencies found for '{feature}': {}", .offenders.join(", "))]
    CyclicDependency {
        /// The feature being modified
        feature: String,
        /// Every candidate dependency that already reaches `feature`, sorted
        offenders: Vec<String>,
    },

    /// The feature is still referenced by features or containers.
    #[error("Can't delete feature '{name}': {}", describe_referencers(.by_features, .by_containers))]
    InUse {
        /// The feature targeted for deletion
        name: String,
        /// Names of features depending on it
        by_features: Vec<String>,
        /// Names of containers referencing it
        by_containers: Vec<String>,
    },

    /// The store failed for reasons outside the validation rules.
    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl CatalogError {
    /// Maps a store-level unique violation to [`CatalogError::DuplicateName`].
    ///
    /// Uniqueness is validated before writing, but a concurrent writer can
    /// still win the race; the store's constraint is the backstop.
    #[must_use]
    pub fn from_save(error: StoreError) -> Self {
        match error {
            StoreError::UniqueViolation {
                name,
            } => Self::DuplicateName {
                name,
            },
            other => Self::Storage(other),
        }
    }
}

fn describe_referencers(by_features: &[String], by_containers: &[String]) -> String {
    let mut parts = Vec::new();
    if !by_features.is_empty() {
        parts.push(format!("references found: {}", by_features.join(", ")));
    }
    if !by_containers.is_empty() {
        parts.push(format!("references from containers found: {}", by_containers.join(", ")));
    }
    parts.join("; ")
}

/// Failures raised by feature store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Save would give two features the same name.
    #[error("Unique constraint violated: feature name '{name}' is already taken")]
    UniqueViolation {
        /// The duplicated name
        name: String,
    },

    /// The catalog file could not be parsed.
    #[error("Invalid catalog file syntax in {path}: {reason}")]
    Parse {
        /// Path of the catalog file
        path: String,
        /// Parser message
        reason: String,
    },

    /// The catalog could not be serialized.
    #[error("Catalog serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The catalog lock could not be acquired.
    #[error("Failed to lock catalog {path}: {reason}")]
    Lock {
        /// Path of the lock file
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// A previous transaction panicked while holding the catalog.
    #[error("Catalog state is poisoned by a panicked transaction")]
    Poisoned,

    /// Any other I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error wrapper carrying user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The message shown on the `error:` line
    pub error: String,
    /// Actionable hint for the user
    pub suggestion: Option<String>,
    /// Additional explanation
    pub details: Option<String>,
}

impl ErrorContext {
    /// Creates a context with only the error message.
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            error: error.to_string(),
            suggestion: None,
            details: None,
        }
    }

    /// Adds a suggestion line.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Adds a details line.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Converts any error into an [`ErrorContext`] with a suggestion where one is known.
///
/// An [`ErrorContext`] already attached to the chain (for example one carrying
/// "did you mean" hints) is passed through unchanged.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<ErrorContext>() {
        Ok(ctx) => return ctx,
        Err(error) => error,
    };

    if let Some(catalog_error) = error.downcast_ref::<CatalogError>() {
        return create_error_context(catalog_error);
    }

    if let Some(store_error) = error.downcast_ref::<StoreError>() {
        return create_store_error_context(store_error);
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(message)
}

fn create_error_context(error: &CatalogError) -> ErrorContext {
    match error {
        CatalogError::EmptyName => ErrorContext::new(error)
            .with_suggestion("Provide a non-blank feature name"),
        CatalogError::DuplicateName {
            name,
        } => ErrorContext::new(error).with_suggestion(format!(
            "Choose a different name or update the existing feature with 'dockcat update {name}'"
        )),
        CatalogError::NotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run 'dockcat list' to see the features in the catalog"),
        CatalogError::UnresolvedNames {
            ..
        } => ErrorContext::new(error)
            .with_details("Every dependency must already exist in the catalog")
            .with_suggestion("Create the missing features first, or fix the spelling"),
        CatalogError::CyclicDependency {
            ..
        } => ErrorContext::new(error)
            .with_details("The listed features already depend on this feature, directly or transitively")
            .with_suggestion("Remove the offending features from the dependency list"),
        CatalogError::InUse {
            name,
            ..
        } => ErrorContext::new(error).with_suggestion(format!(
            "Remove '{name}' from the dependencies of the referencing features and containers first"
        )),
        CatalogError::Storage(store_error) => create_store_error_context(store_error),
    }
}

fn create_store_error_context(error: &StoreError) -> ErrorContext {
    match error {
        StoreError::Parse {
            path,
            ..
        } => ErrorContext::new(error).with_suggestion(format!(
            "Check the TOML syntax in {path}. Run 'dockcat check' after fixing it"
        )),
        StoreError::Lock {
            ..
        } => ErrorContext::new(error)
            .with_details("Another dockcat process may be holding the catalog")
            .with_suggestion("Wait for the other process to finish and retry"),
        StoreError::Poisoned => ErrorContext::new(error)
            .with_suggestion("Restart the process; no changes from the failed transaction were kept"),
        _ => ErrorContext::new(error),
    }
}
