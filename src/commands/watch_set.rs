use std::path::Path;

use anyhow::Result;

use crate::ui::output::render_watch_set;

use super::CommandContext;

pub fn cmd_watch_set(ctx: &CommandContext, path: &Path) -> Result<()> {
    let rules = ctx.engine().resolve_watch_set(path);

    if ctx.json {
        println!("{}", serde_json::to_string(&rules)?);
    } else {
        print!("{}", render_watch_set(&rules));
    }

    Ok(())
}
