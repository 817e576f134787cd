//! User configuration for dockcat.
//!
//! The configuration file lives at `~/.dockcat/config.toml`
//! (`%LOCALAPPDATA%\dockcat\config.toml` on Windows). Its location can be
//! overridden with `--config` or the `DOCKCAT_CONFIG` environment variable.
//! A missing file is not an error; every setting has a default.
//!
//! ```toml
//! # Catalog used when --catalog and DOCKCAT_CATALOG are not given
//! catalog_path = "~/catalogs/dockcat.toml"
//!
//! # Leading FROM line for `dockcat compose`
//! base_image = "ubuntu:24.04"
//!
//! # Author recorded on features created without --author
//! author = "Platform Team"
//! ```
//!
//! # Catalog Location
//!
//! The catalog file is chosen in this order:
//!
//! 1. `--catalog PATH`
//! 2. `DOCKCAT_CATALOG` environment variable
//! 3. `catalog_path` from this file, with `~` and `$VAR` expanded
//! 4. `./dockcat.toml`

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::store::DEFAULT_CATALOG_FILE;
use crate::utils::{get_home_dir, resolve_path};

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "DOCKCAT_CONFIG";

/// Environment variable overriding the catalog file location.
pub const CATALOG_ENV: &str = "DOCKCAT_CATALOG";

/// Settings read from the user configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Default catalog file
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Default base image for composition
    #[serde(default)]
    pub base_image: Option<String>,

    /// Default author for created features
    #[serde(default)]
    pub author: Option<String>,
}

impl CatalogConfig {
    /// Load the configuration from `path`, or from the default location when
    /// `path` is `None`. A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match std::env::var_os(CONFIG_ENV) {
                Some(env_path) => PathBuf::from(env_path),
                None => Self::default_path()?,
            },
        };

        if !path.exists() {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path).await
    }

    /// Load the configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Default configuration file location.
    ///
    /// # Errors
    ///
    /// Fails when the home (or local data) directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("dockcat")
        } else {
            get_home_dir()?.join(".dockcat")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Decide which catalog file to use.
    ///
    /// # Errors
    ///
    /// Fails when `catalog_path` references an undefined environment variable.
    pub fn resolve_catalog_path(&self, cli_override: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path);
        }
        if let Some(env_path) = std::env::var_os(CATALOG_ENV)
            && !env_path.is_empty()
        {
            return Ok(PathBuf::from(env_path));
        }
        if let Some(configured) = &self.catalog_path {
            return resolve_path(configured)
                .with_context(|| format!("Invalid catalog_path in config: {configured}"));
        }
        Ok(PathBuf::from(DEFAULT_CATALOG_FILE))
    }
}
