//! Command-line interface for dockcat.
//!
//! Each subcommand lives in its own module with its clap argument struct and
//! an `execute` method. Commands share a [`CommandContext`] that carries the
//! loaded configuration and the feature service bound to the selected catalog
//! file.
//!
//! # Available Commands
//!
//! ## Catalog Editing
//! - `create` - Add a feature with its Dockerfile fragment and dependencies
//! - `update` - Change any subset of a feature's fields, including its name
//! - `delete` - Remove a feature nothing else depends on
//!
//! ## Inspection
//! - `show` - Print one feature
//! - `list` - List features, optionally filtered by a name fragment
//! - `check` - Audit a (possibly hand-edited) catalog file for integrity problems
//!
//! ## Composition
//! - `compose` - Render the requested features and their dependencies into a Dockerfile
//!
//! # Example
//!
//! ```bash
//! dockcat create java --docker-data "RUN apt-get install -y openjdk-17-jdk"
//! dockcat create maven --docker-file maven.Dockerfile --depends-on java
//! dockcat compose maven --base-image ubuntu:24.04 --output Dockerfile
//! ```
//!
//! # Global Options
//!
//! - `--catalog` - Catalog file to operate on
//! - `--config` - Path to a custom config file
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only log errors

mod check;
pub mod common;
mod compose;
mod create;
mod delete;
mod list;
mod output;
mod show;
mod update;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use common::CommandContext;

/// Settings derived from the global flags before a command runs.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level applied when `RUST_LOG` is not set
    pub log_level: String,

    /// Explicit configuration file
    pub config_path: Option<PathBuf>,

    /// Explicit catalog file
    pub catalog_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over the level chosen by the flags.
    /// Installing twice is a no-op.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Main CLI structure for dockcat.
#[derive(Parser)]
#[command(
    name = "dockcat",
    about = "Feature catalog and Dockerfile composer",
    version,
    author,
    long_about = "dockcat keeps a catalog of reusable Dockerfile fragments (features) with \
                  dependencies between them, and composes any set of features together with \
                  everything they depend on into a single Dockerfile."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the configuration file (default: ~/.dockcat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the catalog file (default: $DOCKCAT_CATALOG or ./dockcat.toml)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a feature
    Create(create::CreateCommand),

    /// Update a feature
    Update(update::UpdateCommand),

    /// Show a single feature
    Show(show::ShowCommand),

    /// List features
    List(list::ListCommand),

    /// Delete a feature
    Delete(delete::DeleteCommand),

    /// Compose features into a Dockerfile
    Compose(compose::ComposeCommand),

    /// Check the catalog for integrity problems
    Check(check::CheckCommand),
}

impl Cli {
    /// Settings derived from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
            catalog_path: self.catalog.clone(),
        }
    }

    /// Run the selected command.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `main` turns it into a user-facing message.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Run the selected command with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let ctx = CommandContext::load(&config).await?;

        match self.command {
            Commands::Create(cmd) => cmd.execute(&ctx).await,
            Commands::Update(cmd) => cmd.execute(&ctx).await,
            Commands::Show(cmd) => cmd.execute(&ctx).await,
            Commands::List(cmd) => cmd.execute(&ctx).await,
            Commands::Delete(cmd) => cmd.execute(&ctx).await,
            Commands::Compose(cmd) => cmd.execute(&ctx).await,
            Commands::Check(cmd) => cmd.execute(&ctx).await,
        }
    }
}
