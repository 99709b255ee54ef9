//! Plain text rendering for command results

use std::fmt::Write;

use serde::Serialize;

use synec::{ConfigWarning, WatchRuleSet};

/// Print config warnings (unknown keys) to stderr.
pub fn print_config_warnings(warnings: &[ConfigWarning]) {
    for w in warnings {
        if let Some(line) = w.line {
            eprintln!("⚠ Unknown config key '{}' in {}:{}", w.key, w.file.display(), line);
        } else {
            eprintln!("⚠ Unknown config key '{}' in {}", w.key, w.file.display());
        }

        if let Some(suggestion) = &w.suggestion {
            eprintln!("   Did you mean '{}'?\n", suggestion);
        }
    }
}

/// One row of `synec status`
#[derive(Debug, Serialize)]
pub struct PackageStatus {
    pub path: String,
    pub name: Option<String>,
    pub installable: bool,
    /// `None` when not installable or the fingerprint could not be computed
    pub needs_update: Option<bool>,
}

pub fn render_status_line(status: &PackageStatus) -> String {
    let name = status.name.as_deref().unwrap_or("<unnamed>");
    let state = match (status.installable, status.needs_update) {
        (false, _) => "✗ not installable (missing name or version)",
        (true, Some(true)) => "↻ needs update",
        (true, Some(false)) => "✓ up to date",
        (true, None) => "? unknown",
    };
    format!("{name:<24} {:<32} {state}", status.path)
}

pub fn render_watch_set(rules: &WatchRuleSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rules.name);
    let _ = writeln!(out, "  include: {}", rules.include.join(", "));
    let _ = writeln!(out, "  exclude: {}", rules.exclude.join(", "));
    out
}
