//! Shared state and helpers for CLI commands.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::CliConfig;
use crate::config::CatalogConfig;
use crate::core::{CatalogError, ErrorContext, user_friendly_error};
use crate::graph::similar_names;
use crate::service::FeatureService;
use crate::store::FileCatalog;

/// Everything a command needs: configuration and the catalog service.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Loaded user configuration
    pub config: CatalogConfig,
    service: Arc<FeatureService<FileCatalog>>,
}

impl CommandContext {
    /// Load the configuration and open the selected catalog.
    ///
    /// # Errors
    ///
    /// Fails when the configuration file cannot be read or the catalog path
    /// cannot be resolved.
    pub async fn load(cli: &CliConfig) -> Result<Self> {
        let config = CatalogConfig::load_with_optional(cli.config_path.clone()).await?;
        let catalog_path = config.resolve_catalog_path(cli.catalog_path.clone())?;
        tracing::debug!("Using catalog {}", catalog_path.display());

        Ok(Self::new(config, catalog_path))
    }

    /// Build a context from already-resolved parts.
    pub fn new(config: CatalogConfig, catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            service: Arc::new(FeatureService::new(FileCatalog::new(catalog_path))),
        }
    }

    /// The catalog file commands operate on.
    #[must_use]
    pub fn catalog_path(&self) -> &Path {
        self.service.catalog().path()
    }

    /// Run a service operation on the blocking thread pool.
    ///
    /// Catalog transactions take a file lock and do synchronous I/O, so they
    /// are kept off the async runtime. Unknown-name errors are enriched with
    /// "did you mean" hints drawn from the catalog.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or an error if the task panicked.
    pub async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&FeatureService<FileCatalog>) -> Result<T, CatalogError> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let result = tokio::task::spawn_blocking(move || operation(&service))
            .await
            .context("Catalog operation panicked")?;

        match result {
            Ok(value) => Ok(value),
            Err(e) => Err(self.with_hints(e).await),
        }
    }

    async fn with_hints(&self, error: CatalogError) -> anyhow::Error {
        let unknown: Vec<String> = match &error {
            CatalogError::NotFound {
                name,
            } => vec![name.clone()],
            CatalogError::UnresolvedNames {
                missing,
            } => missing.clone(),
            _ => Vec::new(),
        };
        if unknown.is_empty() {
            return error.into();
        }

        let service = Arc::clone(&self.service);
        let names = match tokio::task::spawn_blocking(move || service.names()).await {
            Ok(Ok(names)) => names,
            _ => return error.into(),
        };

        let hints: Vec<String> = unknown
            .iter()
            .filter_map(|name| {
                let similar = similar_names(name, &names);
                (!similar.is_empty()).then(|| format!("'{name}' -> {}", similar.join(", ")))
            })
            .collect();

        if hints.is_empty() {
            return error.into();
        }

        let ctx = user_friendly_error(error.into());
        ctx.with_suggestion(format!("Did you mean: {}", hints.join("; "))).into()
    }
}

/// Trim the names given to `--depends-on`.
///
/// # Errors
///
/// Fails when a name is blank, as produced by `--depends-on ""` or a stray
/// comma.
pub fn dependency_names(names: Vec<String>) -> Result<Vec<String>> {
    if names.iter().any(|name| name.trim().is_empty()) {
        return Err(ErrorContext::new(format!(
            "Empty feature name in --depends-on '{}'",
            names.join(",")
        ))
        .with_suggestion("Separate names with single commas, e.g. --depends-on java,node")
        .into());
    }
    Ok(names.into_iter().map(|name| name.trim().to_string()).collect())
}

/// Read an inline value or the contents of a file, whichever was given.
///
/// # Errors
///
/// Fails when the file cannot be read.
pub async fn inline_or_file(inline: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    match (inline, file) {
        (Some(value), _) => Ok(Some(value)),
        (None, Some(path)) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(Some(content))
        }
        (None, None) => Ok(None),
    }
}
