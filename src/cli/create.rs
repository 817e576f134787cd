//! `dockcat create`

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::{CommandContext, dependency_names, inline_or_file};
use crate::core::NewFeature;

/// Create a feature.
#[derive(Args, Debug)]
pub struct CreateCommand {
    /// Feature name
    pub name: String,

    /// Dockerfile fragment
    #[arg(long, conflicts_with = "docker_file")]
    pub docker_data: Option<String>,

    /// Read the Dockerfile fragment from a file
    #[arg(long)]
    pub docker_file: Option<PathBuf>,

    /// Comma-separated names of the features this one depends on
    #[arg(long, value_delimiter = ',')]
    pub depends_on: Vec<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Author (default: `author` from config)
    #[arg(long)]
    pub author: Option<String>,

    /// Test script fragment
    #[arg(long, conflicts_with = "test_file")]
    pub test_snippet: Option<String>,

    /// Read the test script fragment from a file
    #[arg(long)]
    pub test_file: Option<PathBuf>,
}

impl CreateCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Fails when a fragment file cannot be read or the feature is rejected.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let new = NewFeature {
            docker_data: inline_or_file(self.docker_data, self.docker_file.as_deref()).await?,
            test_snippet: inline_or_file(self.test_snippet, self.test_file.as_deref()).await?,
            dependencies: dependency_names(self.depends_on)?,
            description: self.description,
            author: self.author.or_else(|| ctx.config.author.clone()),
            ..NewFeature::named(self.name)
        };

        let feature = ctx.run(move |service| service.create(new)).await?;

        println!(
            "{} Created feature '{}' ({} dependencies)",
            "✓".green(),
            feature.name,
            feature.dependencies.len()
        );
        Ok(())
    }
}
