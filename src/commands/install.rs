use anyhow::Result;

use synec::InstallOutcome;

use super::CommandContext;

pub fn cmd_install(ctx: &CommandContext, script: bool) -> Result<()> {
    if ctx.skip_in_production() {
        return Ok(());
    }

    let engine = ctx.engine();
    let Some(paths) = ctx.references(&engine) else {
        return Ok(());
    };

    if script && ctx.config.run.script {
        if let Err(e) = engine.ensure_consumer_dependencies() {
            tracing::warn!(error = %e, "installing consumer dependencies failed");
        }
        // Build mode returns no handles.
        engine.run_scripts(&paths, false);
    }

    let outcome = engine.install_without_save(&paths)?;

    if !ctx.json {
        match outcome {
            InstallOutcome::NothingToInstall => println!("Nothing to install."),
            InstallOutcome::UpToDate { packages } => {
                println!("✓ {} local package(s) up to date", packages.len())
            }
            InstallOutcome::Installed { packages } => {
                println!("✓ Installed {} local package(s)", packages.len())
            }
        }
    }

    Ok(())
}
