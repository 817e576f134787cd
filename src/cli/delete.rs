//! `dockcat delete`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::CommandContext;

/// Delete a feature that nothing depends on.
#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Feature name
    pub name: String,
}

impl DeleteCommand {
    /// Execute the command. Deleting a missing feature succeeds.
    ///
    /// # Errors
    ///
    /// Fails when features or containers still reference the feature.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let name = self.name.clone();
        let deleted = ctx.run(move |service| service.delete(&name)).await?;

        if deleted {
            println!("{} Deleted feature '{}'", "✓".green(), self.name);
        } else {
            println!("{} Feature '{}' does not exist, nothing deleted", "!".yellow(), self.name);
        }
        Ok(())
    }
}
