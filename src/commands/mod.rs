//! CLI command implementations

pub mod install;
pub mod status;
pub mod watch;
pub mod watch_set;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use synec::{Config, Engine};

use crate::cli::Cli;
use crate::ui::events::EventPrinter;
use crate::ui::output::print_config_warnings;

/// Settings shared by every command
pub struct CommandContext {
    pub root: PathBuf,
    pub config: Config,
    pub json: bool,
}

impl CommandContext {
    /// Resolve the consumer root and load configuration, CLI flags last.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("cannot determine current directory")?,
        };

        let (mut config, warnings) = Config::discover(&root)?;
        print_config_warnings(&warnings);

        if cli.production {
            config.set_production(true);
        }

        Ok(Self {
            root,
            config,
            json: cli.json,
        })
    }

    pub fn engine(&self) -> Engine {
        Engine::with_npm(
            self.root.clone(),
            self.config.clone(),
            Arc::new(EventPrinter::new(self.json)),
        )
    }

    /// Production builds never touch local packages unless asked to.
    pub fn skip_in_production(&self) -> bool {
        let production = std::env::var("NODE_ENV").is_ok_and(|env| env == "production");
        if production && !self.config.run.production {
            tracing::info!("NODE_ENV=production, skipping (use --production to override)");
            return true;
        }
        false
    }

    /// Local references of the consumer, or `None` after telling the user
    /// there is nothing to do.
    pub fn references(&self, engine: &Engine) -> Option<Vec<PathBuf>> {
        let references = engine.local_references();
        if references.is_none() && !self.json {
            println!(
                "No local references declared in {}",
                engine.layout().manifest_path(Path::new("")).display()
            );
        }
        references
    }
}
