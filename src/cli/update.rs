//! `dockcat update`

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::{CommandContext, dependency_names, inline_or_file};
use crate::core::{ErrorContext, FeatureUpdate};

/// Update a feature. Options that are not given leave the field unchanged.
#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// Current feature name
    pub name: String,

    /// New name
    #[arg(long)]
    pub rename: Option<String>,

    /// Replace the Dockerfile fragment
    #[arg(long, conflicts_with = "docker_file")]
    pub docker_data: Option<String>,

    /// Replace the Dockerfile fragment with the contents of a file
    #[arg(long)]
    pub docker_file: Option<PathBuf>,

    /// Replace the dependencies with these comma-separated names
    #[arg(long, value_delimiter = ',', conflicts_with = "no_dependencies")]
    pub depends_on: Option<Vec<String>>,

    /// Remove every dependency
    #[arg(long)]
    pub no_dependencies: bool,

    /// Replace the description
    #[arg(long)]
    pub description: Option<String>,

    /// Replace the author
    #[arg(long)]
    pub author: Option<String>,

    /// Replace the test script fragment
    #[arg(long, conflicts_with = "test_file")]
    pub test_snippet: Option<String>,

    /// Replace the test script fragment with the contents of a file
    #[arg(long)]
    pub test_file: Option<PathBuf>,
}

impl UpdateCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Fails when nothing would change, a file cannot be read, or the update
    /// is rejected.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let dependencies = if self.no_dependencies {
            Some(Vec::new())
        } else {
            self.depends_on.map(dependency_names).transpose()?
        };

        let update = FeatureUpdate {
            new_name: self.rename,
            docker_data: inline_or_file(self.docker_data, self.docker_file.as_deref()).await?,
            dependencies,
            description: self.description,
            author: self.author,
            test_snippet: inline_or_file(self.test_snippet, self.test_file.as_deref()).await?,
        };

        if update.is_empty() {
            return Err(ErrorContext::new(format!("Nothing to update for '{}'", self.name))
                .with_suggestion("Pass at least one option, see 'dockcat update --help'")
                .into());
        }

        let name = self.name;
        let feature = ctx.run(move |service| service.update(&name, update)).await?;

        println!("{} Updated feature '{}'", "✓".green(), feature.name);
        Ok(())
    }
}
