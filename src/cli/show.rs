//! `dockcat show`

use anyhow::Result;
use clap::Args;

use super::common::CommandContext;
use super::output::print_summary;

/// Show one feature.
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Feature name
    pub name: String,

    /// Output format (table, json, yaml)
    #[arg(short = 'f', long, default_value = "table")]
    pub format: String,
}

impl ShowCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Fails when the feature does not exist.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let name = self.name;
        let summary = ctx.run(move |service| service.summary(&name)).await?;

        print_summary(&summary, &self.format)
    }
}
