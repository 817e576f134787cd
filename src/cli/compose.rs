//! `dockcat compose`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::CommandContext;
use crate::compose::ComposeOptions;
use crate::utils::atomic_write;

/// Compose features and their dependencies into a Dockerfile.
#[derive(Args, Debug)]
pub struct ComposeCommand {
    /// Features to compose
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,

    /// Image for the leading FROM line (default: `base_image` from config)
    #[arg(long)]
    pub base_image: Option<String>,

    /// Write the Dockerfile here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the composed test script here
    #[arg(long)]
    pub tests_output: Option<PathBuf>,
}

impl ComposeCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Fails when a name is unknown, the stored graph has a cycle, or an
    /// output file cannot be written.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let options = ComposeOptions {
            base_image: self.base_image.or_else(|| ctx.config.base_image.clone()),
        };
        let names = self.names;
        let artifact = ctx.run(move |service| service.compose(&names, &options)).await?;

        match &self.output {
            Some(path) => {
                atomic_write(path, artifact.dockerfile.as_bytes())
                    .with_context(|| format!("Failed to write Dockerfile to {}", path.display()))?;
                println!(
                    "{} Composed {} features into {}",
                    "✓".green(),
                    artifact.features.len(),
                    path.display()
                );
            }
            None => print!("{}", artifact.dockerfile),
        }

        if let Some(path) = &self.tests_output {
            match &artifact.test_script {
                Some(script) => {
                    atomic_write(path, script.as_bytes()).with_context(|| {
                        format!("Failed to write test script to {}", path.display())
                    })?;
                    tracing::info!("Wrote test script to {}", path.display());
                }
                None => {
                    tracing::warn!(
                        "None of the composed features has a test snippet; {} not written",
                        path.display()
                    );
                }
            }
        }

        Ok(())
    }
}
