use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use super::CommandContext;

pub fn cmd_watch(ctx: &CommandContext, script: bool) -> Result<()> {
    if ctx.skip_in_production() {
        return Ok(());
    }

    let engine = ctx.engine();
    let Some(paths) = ctx.references(&engine) else {
        return Ok(());
    };

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let scripts = if script && ctx.config.run.script {
        if let Err(e) = engine.ensure_consumer_dependencies() {
            tracing::warn!(error = %e, "installing consumer dependencies failed");
        }
        engine.run_scripts(&paths, true)
    } else {
        Vec::new()
    };

    // Dropping `scripts` on error kills the background builds.
    engine.install_without_save(&paths)?;

    let session = engine.watch_references(&paths)?;

    if !ctx.json {
        println!(
            "Watching {} package(s). Press Ctrl+C to stop",
            session.packages().len()
        );
    }

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }

    session.stop();
    for handle in &scripts {
        handle.stop();
    }

    Ok(())
}
