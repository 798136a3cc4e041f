//! Cumulus CLI - submit remote ML training runs
//!
//! Provides a `cumulus` command that drives the training-job submitter:
//! resolve a workspace, register an environment, and submit a script run to a
//! compute target, streaming status and logs until the run finishes.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "cumulus",
    author,
    version,
    about = "Cumulus - training-job submission for remote ML workspaces"
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a training run and wait for it to finish
    ///
    /// Runs the full sequence: workspace, environment registration,
    /// experiment, compute target, submission. The exit status reflects both
    /// submission success and the run's terminal state.
    Submit {
        /// Path to the submit configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Return right after submission instead of waiting for completion
        #[arg(long)]
        no_wait: bool,

        /// Credential token from the out-of-band platform login
        #[arg(long, default_value = "cli-session")]
        token: String,
    },

    /// Resolve the configured workspace and stop
    ///
    /// Verifies the credential and workspace coordinates without submitting
    /// anything.
    Check {
        /// Path to the submit configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Credential token from the out-of-band platform login
        #[arg(long, default_value = "cli-session")]
        token: String,
    },
}

fn init_tracing(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match args.command {
        Command::Submit { config, no_wait, token } => {
            commands::submit::execute(&config, no_wait, &token).await
        }
        Command::Check { config, token } => commands::check::execute(&config, &token).await,
    }
}
