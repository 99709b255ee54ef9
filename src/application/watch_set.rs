//! Watch-set resolution
//!
//! Decides which files of a source package are mirrored, with this
//! precedence:
//! 1. the declared `files` list (plus the manifest and entry point)
//! 2. the legacy ignore file, as excludes over everything
//! 3. everything, with a warning
//!
//! The dependency directory and dot entries are always excluded.

use std::path::Path;

use crate::domain::value_objects::{
    normalize_entry_point, LegacyIgnore, WatchRuleSet, INCLUDE_ALL,
};

use super::context::SyncContext;

/// Compute the rule set for one package. Never cached, so edits to the
/// package's ignore file are picked up by the next watch session.
pub fn resolve_watch_set(ctx: &SyncContext, package_path: &Path) -> WatchRuleSet {
    let descriptor = ctx.descriptor(package_path);
    let name = descriptor.name().unwrap_or_default().to_string();
    let mut exclude = WatchRuleSet::baseline_exclude(ctx.layout.dependency_dir_name());

    if let Some(files) = descriptor.declared_files() {
        let mut include = vec![ctx.layout.manifest_file().to_string()];
        if let Some(main) = descriptor.main.as_deref() {
            match normalize_entry_point(main) {
                Some(entry) => include.push(entry),
                None => tracing::warn!(
                    package = %name,
                    main,
                    "entry point is outside the package and will not be watched"
                ),
            }
        }
        include.extend(files.iter().cloned());
        return WatchRuleSet {
            include,
            exclude,
            name,
        };
    }

    let source_dir = ctx.source_dir(package_path);
    let legacy = match LegacyIgnore::load(&source_dir, &ctx.config.package.ignore_file) {
        Ok(legacy) => legacy,
        Err(e) => {
            tracing::warn!(package = %name, error = %e, "ignoring unreadable ignore file");
            LegacyIgnore::empty()
        }
    };

    if legacy.is_empty() {
        tracing::warn!(
            package = %name,
            "no `files` list or {} found, watching every file; declare one to narrow the watch",
            ctx.config.package.ignore_file
        );
    } else {
        let mut patterns = legacy.into_patterns();
        patterns.append(&mut exclude);
        exclude = patterns;
    }

    WatchRuleSet {
        include: vec![INCLUDE_ALL.to_string()],
        exclude,
        name,
    }
}
