use anyhow::Result;

use crate::ui::output::{render_status_line, PackageStatus};

use super::CommandContext;

pub fn cmd_status(ctx: &CommandContext) -> Result<()> {
    let engine = ctx.engine();
    let Some(paths) = ctx.references(&engine) else {
        return Ok(());
    };

    for path in &paths {
        let descriptor = engine.manifests().get(path);
        let installable = descriptor.is_installable();
        let needs_update = if installable {
            match engine.needs_update(path) {
                Ok(stale) => Some(stale),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot compute fingerprint");
                    None
                }
            }
        } else {
            None
        };

        let status = PackageStatus {
            path: path.display().to_string(),
            name: descriptor.name().map(str::to_string),
            installable,
            needs_update,
        };

        if ctx.json {
            println!("{}", serde_json::to_string(&status)?);
        } else {
            println!("{}", render_status_line(&status));
        }
    }

    Ok(())
}
