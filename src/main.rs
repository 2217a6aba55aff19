//! docs-sync - publish documentation changes from CI.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docs_sync::cli;
use docs_sync::config::Config;
use docs_sync::Error;

#[derive(Parser)]
#[command(name = "docs-sync")]
#[command(about = "Upload documentation changes for translation and publish them")]
#[command(version)]
struct Cli {
    /// Repository to operate on (defaults to the current directory)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Settings file (defaults to docs-sync.toml in the repository)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload changes and push or open a pull request (default)
    Process,

    /// Show how the current changes would be handled, without side effects
    Classify {
        /// Read porcelain status from a file (`-` for stdin) instead of git
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docs_sync={}", default_level)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let repo = match cli.repo {
        Some(repo) => repo,
        None => std::env::current_dir()?,
    };
    let settings_path = cli.config.as_deref();

    match cli.command.unwrap_or(Commands::Process) {
        Commands::Process => {
            let config = Config::from_env();
            cli::process::run(&config, &repo, settings_path).await
        }
        Commands::Classify { input, json } => {
            cli::classify::run(&repo, settings_path, input.as_deref(), json).await
        }
    }
}
