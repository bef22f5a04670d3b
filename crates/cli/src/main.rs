//! docguard CLI - documentation comments to executable specifications
//!
//! This binary provides the command-line interface for the docguard translator.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docguard::{check_config, translate_file, Config};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "docguard")]
#[command(about = "Translate method documentation into executable conditions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate the tags of every method in a JSON file
    Translate {
        /// JSON array of { method, tags } records
        input: PathBuf,

        /// Write specifications here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Validate configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    match cli.command {
        Some(Commands::Translate { input, output }) => {
            let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
            let count = translate_file(&input, output.as_deref(), &config).await?;
            info!("Translated {count} methods");
            Ok(())
        }
        Some(Commands::CheckConfig) => {
            print!("{}", check_config(cli.config.as_deref())?);
            Ok(())
        }
        None => {
            println!("Run 'docguard translate <INPUT>' to translate documentation, or --help for more options");
            Ok(())
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "docguard={level},docguard_core={level},docguard_nlp={level},docguard_translator={level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
