//! `dockcat check`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::CommandContext;
use crate::core::ErrorContext;

/// Audit the catalog file for duplicate names, cycles and dangling references.
#[derive(Args, Debug)]
pub struct CheckCommand {}

impl CheckCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Fails when the catalog cannot be read or has integrity problems.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let audit = ctx.run(|service| service.check()).await?;

        if audit.is_consistent() {
            println!(
                "{} Catalog {} is consistent ({} features)",
                "✓".green(),
                ctx.catalog_path().display(),
                audit.feature_count
            );
            return Ok(());
        }

        for issue in &audit.issues {
            println!("  {} {issue}", "✗".red());
        }

        Err(ErrorContext::new(format!(
            "Catalog {} has {} integrity problem(s)",
            ctx.catalog_path().display(),
            audit.issues.len()
        ))
        .with_suggestion("Edit the catalog file to fix the listed problems")
        .into())
    }
}
