//! NepTools CLI - Command-line interface for Neptunia asset tools

pub mod commands;
pub mod progress;

use clap::{ArgAction, Parser};
use commands::Commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "neptools")]
#[command(about = "NepTools: ISM2, ARC and face.anm tools for Neptunia games", long_about = None)]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v shows the section-by-section decode log)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Run the `NepTools` CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    cli.command.execute(cli.verbose > 0)?;

    Ok(())
}
