//! Coro CLI - offline audition tool for the coro chorus engines.
//!
//! Runs WAV files through the block-based chorus engines exactly as the
//! embedded pipeline would, and generates deterministic test signals for
//! listening checks and regression captures.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coro")]
#[command(author, version, about = "Offline audition tool for the coro chorus engines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through a chorus engine
    Process(commands::process::ProcessArgs),

    /// Generate test signals
    Generate(commands::generate::GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Generate(args) => commands::generate::run(args),
    }
}
