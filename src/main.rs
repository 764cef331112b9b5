//! StylistGuild - maintenance toolkit for an Obsidian theme catalog
//!
//! Keeps the addon catalog in sync with the official community theme list,
//! collects tags from contributors and renders the documentation pages.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stylistguild::cli::{Commands, ExitCode, GlobalOptions};

/// StylistGuild - Obsidian theme catalog toolkit
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./stylistguild.toml, then the user config dir)
    #[arg(long, global = true, value_name = "FILE", env = "STYLISTGUILD_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let globals = GlobalOptions {
        config: cli.config,
        verbose: cli.verbose,
    };

    match cli.command.execute(&globals) {
        Ok(()) => std::process::exit(ExitCode::Success.code()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code().code());
        }
    }
}
