use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Synec - keep local npm packages mirrored into node_modules
#[derive(Parser, Debug)]
#[command(name = "synec")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "Packages are read from \"localReferences\" in the consumer's package.json."
)]
pub struct Cli {
    /// Consumer project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Emit events as NDJSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Run even when NODE_ENV=production
    #[arg(long, global = true)]
    pub production: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build local packages and reinstall the ones that changed
    Install {
        /// Skip package build scripts
        #[arg(long)]
        no_script: bool,
    },

    /// Install, then mirror changes until interrupted
    Watch {
        /// Skip package watch scripts
        #[arg(long)]
        no_script: bool,
    },

    /// Show whether each local package is installable and up to date
    Status,

    /// Print the include/exclude rules of a package
    WatchSet {
        /// Package path, relative to the consumer root
        path: PathBuf,
    },
}
