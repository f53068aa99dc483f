//! # Validate Subcommand
//!
//! Validates a single file, a directory, or (with no path) the default
//! objects directory one category at a time.
//!
//! ```bash
//! troika validate                          # category-by-category run
//! troika validate objects/items/fusil.json
//! troika validate objects --recursive
//! troika validate odd.json --schema troika-item
//! troika validate --list-schemas
//! ```
//!
//! Invalid documents are reported, not fatal: the exit code is 0 unless
//! the schema store cannot be built or the target path does not exist.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use troika_schema::{
    summarize, CategoryRun, SchemaStore, SchemaValidator, Summary, ValidationResult,
};

use crate::config::TroikaConfig;
use crate::render;

/// Arguments for the `troika validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file or directory to validate (default: the objects directory,
    /// validated category by category).
    pub path: Option<PathBuf>,

    /// Directory containing `*.schema.json` files.
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,

    /// Schema identifier to use instead of resolving one from the path.
    #[arg(long)]
    pub schema: Option<String>,

    /// Recurse into subdirectories.
    #[arg(short, long)]
    pub recursive: bool,

    /// List the available schemas and exit.
    #[arg(short, long)]
    pub list_schemas: bool,

    /// Print results as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    results: &'a [ValidationResult],
}

#[derive(Serialize)]
struct JsonCategoryReport<'a> {
    label: &'a str,
    summary: Summary,
    results: &'a [ValidationResult],
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: &TroikaConfig) -> Result<u8> {
    let schema_dir = args.schema_dir.as_deref().unwrap_or(&config.schema_dir);
    let store = SchemaStore::load(schema_dir)?;
    tracing::debug!(schemas = store.len(), dir = %schema_dir.display(), "schema store ready");

    if args.list_schemas {
        print!("{}", render::render_schema_list(&store));
        return Ok(0);
    }

    let validator = SchemaValidator::new(&store);
    let target: &Path = args.path.as_deref().unwrap_or(&config.objects_dir);

    if target.is_file() {
        let result = validator.validate_file(target, args.schema.as_deref());
        emit(std::slice::from_ref(&result), args, config)?;
    } else if target.is_dir() {
        if args.path.is_none() {
            let runs = validator.validate_by_categories(target);
            emit_categories(&runs, args, config)?;
        } else {
            let recursive = args.recursive || config.recursive;
            let results = validator.validate_directory(target, recursive, args.schema.as_deref());
            emit(&results, args, config)?;
        }
    } else {
        bail!("Path '{}' does not exist", target.display());
    }

    Ok(0)
}

fn emit(results: &[ValidationResult], args: &ValidateArgs, config: &TroikaConfig) -> Result<()> {
    if args.json {
        let report = JsonReport {
            summary: summarize(results),
            results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_results(results, config.max_errors_shown));
    }
    Ok(())
}

fn emit_categories(runs: &[CategoryRun], args: &ValidateArgs, config: &TroikaConfig) -> Result<()> {
    if args.json {
        let reports: Vec<JsonCategoryReport<'_>> = runs
            .iter()
            .map(|run| JsonCategoryReport {
                label: &run.label,
                summary: run.summary(),
                results: &run.results,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for run in runs {
        println!("\nValidating {}...", run.label);
        print!("{}", render::render_results(&run.results, config.max_errors_shown));
    }
    Ok(())
}
