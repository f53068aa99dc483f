//! # Convert-Silver Subcommand
//!
//! Rewrites `"<n>_silver"` strings under `value` keys into integers,
//! across every JSON file below the objects directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use troika_schema::silver;

use crate::config::TroikaConfig;

/// Arguments for the `troika convert-silver` subcommand.
#[derive(Args, Debug)]
pub struct ConvertSilverArgs {
    /// Directory to process recursively (default: the objects directory).
    pub dir: Option<PathBuf>,

    /// Report what would change without writing any file.
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the convert-silver subcommand.
pub fn run_convert_silver(args: &ConvertSilverArgs, config: &TroikaConfig) -> Result<u8> {
    let dir = args.dir.as_deref().unwrap_or(&config.objects_dir);

    println!("Silver Value Converter");
    println!("{}", "=".repeat(50));

    let report = silver::convert_corpus(dir, args.dry_run)
        .with_context(|| format!("cannot scan {}", dir.display()))?;

    println!("Found {} JSON files to process", report.files_processed);
    println!();

    let verb = if args.dry_run { "Would modify" } else { "Modified" };
    for file in &report.modified {
        println!("{verb}: {}", file.path.display());
        for change in &file.changes {
            println!("   {change}");
        }
        println!();
    }

    for failure in &report.failures {
        eprintln!("{failure}");
    }

    println!("{}", "=".repeat(50));
    println!("SUMMARY");
    println!("{}", "=".repeat(50));
    println!("Files processed: {}", report.files_processed);
    println!("Files modified: {}", report.modified.len());
    println!("Total conversions: {}", report.total_changes());
    if report.modified.is_empty() {
        println!("No files needed modification.");
    }

    Ok(0)
}
