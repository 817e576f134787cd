//! `dockcat list`

use anyhow::Result;
use clap::Args;

use super::common::CommandContext;
use super::output::print_summaries;

/// List features, sorted by name.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Only list features whose name contains this text (case-insensitive)
    pub filter: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short = 'f', long, default_value = "table")]
    pub format: String,
}

impl ListCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Fails when the catalog cannot be read.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let filter = self.filter.unwrap_or_default();
        let summaries = ctx
            .run(move |service| {
                let features = service.list(&filter)?;
                service.summaries(&features)
            })
            .await?;

        print_summaries(&summaries, &self.format, "Features")
    }
}
