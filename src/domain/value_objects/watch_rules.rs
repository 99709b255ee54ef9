//! Watch rule set value object
//!
//! The include/exclude rules that decide which files of a source package are
//! mirrored into its installed copy. They mirror what the package would ship
//! when published, so development behaves like a real install.

use std::path::{Component, Path};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::Serialize;

/// Include entry meaning "everything under the package root".
pub const INCLUDE_ALL: &str = ".";

/// Matches any dot-prefixed directory anywhere in a path.
pub const DOT_DIR_PATTERN: &str = ".*/";

/// Matches any dot-prefixed final path component.
pub const DOT_FILE_PATTERN: &str = ".*";

/// Per-package include/exclude rules plus the package name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchRuleSet {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub name: String,
}

impl WatchRuleSet {
    /// Patterns excluded from every package regardless of its file list.
    pub fn baseline_exclude(dependency_dir: &str) -> Vec<String> {
        vec![
            dependency_dir.to_string(),
            DOT_DIR_PATTERN.to_string(),
            DOT_FILE_PATTERN.to_string(),
        ]
    }

    pub fn includes_everything(&self) -> bool {
        self.include.iter().any(|p| p == INCLUDE_ALL)
    }

    /// Compile the rules into a matcher rooted at the package directory.
    ///
    /// Invalid patterns are skipped with a warning.
    pub fn matcher(&self, package_root: &Path) -> WatchMatcher {
        let include = if self.includes_everything() {
            None
        } else {
            let anchored: Vec<String> = self.include.iter().map(|p| anchor(p)).collect();
            Some(build_gitignore(package_root, &anchored, &self.name))
        };

        WatchMatcher {
            include,
            exclude: build_gitignore(package_root, &self.exclude, &self.name),
        }
    }
}

/// Pin an include entry to the package root, so `dist` never matches
/// `src/dist`. Entries already rooted or starting with `**/` are kept.
fn anchor(pattern: &str) -> String {
    let (negation, body) = match pattern.strip_prefix('!') {
        Some(rest) => ("!", rest),
        None => ("", pattern),
    };
    let body = body.strip_prefix("./").unwrap_or(body);
    if body.starts_with('/') || body.starts_with("**/") {
        format!("{negation}{body}")
    } else {
        format!("{negation}/{body}")
    }
}

fn build_gitignore(root: &Path, patterns: &[String], package: &str) -> Gitignore {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        if let Err(e) = builder.add_line(None, pattern) {
            tracing::warn!(package, pattern, error = %e, "skipping invalid watch pattern");
        }
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(package, error = %e, "watch patterns could not be compiled");
        Gitignore::empty()
    })
}

/// Compiled form of a [`WatchRuleSet`].
#[derive(Debug)]
pub struct WatchMatcher {
    /// `None` means every path is included.
    include: Option<Gitignore>,
    exclude: Gitignore,
}

impl WatchMatcher {
    /// Whether a path relative to the package root participates in sync.
    pub fn is_watched(&self, rel_path: &Path, is_dir: bool) -> bool {
        if rel_path.as_os_str().is_empty() || rel_path.is_absolute() {
            return false;
        }

        if self
            .exclude
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
        {
            return false;
        }

        match &self.include {
            None => true,
            Some(include) => include
                .matched_path_or_any_parents(rel_path, is_dir)
                .is_ignore(),
        }
    }
}

/// Normalize a declared entry point to a `/`-separated path relative to the
/// package root.
///
/// Returns `None` for empty entry points and ones escaping the root.
pub fn normalize_entry_point(main: &str) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in Path::new(main.trim()).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
