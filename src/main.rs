//! Synec CLI - local package synchronization
//!
//! Usage: synec <COMMAND>
//!
//! Commands:
//!   install    Build local packages and reinstall the ones that changed
//!   watch      Install, then mirror changes until interrupted
//!   status     Show installability and staleness of each local package
//!   watch-set  Print the include/exclude rules of a package

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = commands::CommandContext::load(&cli)?;

    match cli.command {
        Commands::Install { no_script } => commands::install::cmd_install(&ctx, !no_script),
        Commands::Watch { no_script } => commands::watch::cmd_watch(&ctx, !no_script),
        Commands::Status => commands::status::cmd_status(&ctx),
        Commands::WatchSet { path } => commands::watch_set::cmd_watch_set(&ctx, &path),
    }
}

/// Logs go to stderr so stdout stays clean for `--json` event streams.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
