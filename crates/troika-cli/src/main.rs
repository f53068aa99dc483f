//! # troika CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use troika_cli::config::TroikaConfig;
use troika_cli::silver::{run_convert_silver, ConvertSilverArgs};
use troika_cli::validate::{run_validate, ValidateArgs};

/// Troika game-data toolchain.
///
/// Validates JSON objects against the Troika system schemas and
/// normalizes legacy silver values.
#[derive(Parser, Debug)]
#[command(name = "troika", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: ./troika.yaml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate JSON objects against their schemas.
    Validate(ValidateArgs),

    /// Convert "<n>_silver" value strings into integers.
    ConvertSilver(ConvertSilverArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match TroikaConfig::discover(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(?config, "configuration loaded");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::ConvertSilver(args) => run_convert_silver(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}
