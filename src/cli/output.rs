//! Output formatting for feature listings.

use anyhow::{Result, bail};
use colored::Colorize;

use crate::core::FeatureSummary;

/// Supported output formats
pub const FORMATS: [&str; 3] = ["table", "json", "yaml"];

/// Print summaries as a table, JSON or YAML.
///
/// # Errors
///
/// Fails on an unknown format or when serialization fails.
pub fn print_summaries(summaries: &[FeatureSummary], format: &str, title: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(summaries)?),
        "yaml" => print!("{}", serde_yaml::to_string(summaries)?),
        "table" => print_table(summaries, title),
        other => bail!("Unknown output format '{other}'. Expected one of: {}", FORMATS.join(", ")),
    }
    Ok(())
}

/// Print a single summary with all of its fields.
///
/// # Errors
///
/// Fails on an unknown format or when serialization fails.
pub fn print_summary(summary: &FeatureSummary, format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(summary)?),
        "yaml" => print!("{}", serde_yaml::to_string(summary)?),
        "table" => print_detailed(summary),
        other => bail!("Unknown output format '{other}'. Expected one of: {}", FORMATS.join(", ")),
    }
    Ok(())
}

fn print_table(summaries: &[FeatureSummary], title: &str) {
    if summaries.is_empty() {
        println!("No features found.");
        return;
    }

    println!("{}", title.bold());
    println!();

    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0).max(4);
    println!(
        "{:<width$}  {:<30}  {}",
        "Name".cyan().bold(),
        "Depends on".cyan().bold(),
        "Description".cyan().bold()
    );
    println!("{}", "-".repeat(width + 60).bright_black());

    for summary in summaries {
        let deps = if summary.dependencies.is_empty() {
            "-".to_string()
        } else {
            summary.dependencies.join(", ")
        };
        println!(
            "{:<width$}  {:<30}  {}",
            summary.name.bright_white(),
            deps,
            summary.description.as_deref().unwrap_or("").bright_black()
        );
    }

    println!();
    println!("{}: {} features", "Total".green().bold(), summaries.len());
}

fn print_detailed(summary: &FeatureSummary) {
    println!("{}", summary.name.bold());
    if let Some(description) = &summary.description {
        println!("  Description: {description}");
    }
    if let Some(author) = &summary.author {
        println!("  Author: {}", author.yellow());
    }
    println!("  Updated: {}", summary.updated_at.to_rfc3339().bright_black());
    if summary.dependencies.is_empty() {
        println!("  Depends on: -");
    } else {
        println!("  Depends on: {}", summary.dependencies.join(", "));
    }

    println!("  Dockerfile:");
    for line in summary.docker_data.lines() {
        println!("    {line}");
    }
    if let Some(snippet) = &summary.test_snippet {
        println!("  Test:");
        for line in snippet.lines() {
            println!("    {line}");
        }
    }
}
