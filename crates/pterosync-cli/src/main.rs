//! PteroSync CLI - Command-line interface for PteroSync
//!
//! Provides commands for:
//! - Pushing a local tree to every selected server
//! - Listing servers and why they are (not) selected
//! - Previewing the folder plan without touching the network
//! - Inspecting and validating configuration

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    completions::CompletionsCommand, config::ConfigCommand, plan::PlanCommand, sync::SyncCommand,
    targets::TargetsCommand, CommandContext,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "pterosync",
    version,
    about = "Mirror a local directory tree onto panel-managed game servers"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload the local tree to every selected server
    Sync(SyncCommand),
    /// List servers and whether they are selected
    Targets(TargetsCommand),
    /// Show the scanned files and folder plan (no network)
    Plan(PlanCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Picks the log filter: `RUST_LOG`, then `-v`/`-q`, then the config file
fn log_filter(cli: &Cli, ctx: &CommandContext) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = match (cli.verbose, cli.quiet) {
        (0, true) => "error".to_string(),
        (0, false) => ctx
            .load_config()
            .map(|config| config.logging.level)
            .unwrap_or_else(|_| "info".to_string()),
        (1, _) => "debug".to_string(),
        _ => "trace".to_string(),
    };
    EnvFilter::new(level)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let ctx = CommandContext::new(format, cli.quiet, cli.config.clone());

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&cli, &ctx))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Sync(cmd) => cmd.execute(&ctx).await,
        Commands::Targets(cmd) => cmd.execute(&ctx).await,
        Commands::Plan(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
        Commands::Completions(cmd) => cmd.execute(&ctx).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ctx.formatter().error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
