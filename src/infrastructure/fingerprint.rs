//! Fingerprint Store
//!
//! Computes the content fingerprint of a source package and reads/writes the
//! marker file kept inside its installed copy.

use std::fs;
use std::io;
use std::path::Path;

use ignore::WalkBuilder;

use crate::config::Config;
use crate::domain::value_objects::{ContentHash, ContentHasher};
use crate::error::SyncResult;

use super::layout::to_slash;

/// Directory names never descended into while hashing
const TEST_DIRS: &[&str] = &["test", "tests", "__tests__"];

#[derive(Debug, Clone)]
pub struct FingerprintStore {
    dependency_dir: String,
    marker_file: String,
    extensions: Vec<String>,
}

impl FingerprintStore {
    pub fn new(config: &Config) -> Self {
        Self {
            dependency_dir: config.package.dependency_dir.clone(),
            marker_file: config.package.marker_file.clone(),
            extensions: config.package.source_extensions.clone(),
        }
    }

    pub fn marker_file(&self) -> &str {
        &self.marker_file
    }

    /// Hash every relevant file under `source_dir`.
    ///
    /// Files are visited in relative-path order, so the result depends only
    /// on paths and contents, never on directory enumeration order.
    pub fn compute(&self, source_dir: &Path) -> SyncResult<ContentHash> {
        let dependency_dir = self.dependency_dir.clone();
        let walker = WalkBuilder::new(source_dir)
            .standard_filters(false)
            .hidden(true)
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir && (name == dependency_dir.as_str() || TEST_DIRS.contains(&&*name)))
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if !self.is_source_file(entry.path()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(source_dir) else {
                continue;
            };
            files.push((to_slash(relative), entry.into_path()));
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut hasher = ContentHasher::new();
        for (relative, path) in &files {
            let content = fs::read(path)?;
            hasher.add_entry(relative, &content);
        }
        tracing::debug!(
            dir = %source_dir.display(),
            files = hasher.entries(),
            "computed package fingerprint"
        );
        Ok(hasher.finish())
    }

    /// The marker stored in an installed copy, if any
    pub fn stored(&self, installed_dir: &Path) -> SyncResult<Option<ContentHash>> {
        match fs::read_to_string(installed_dir.join(&self.marker_file)) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(ContentHash::new(&content))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write(&self, installed_dir: &Path, hash: &ContentHash) -> SyncResult<()> {
        fs::write(installed_dir.join(&self.marker_file), hash.as_str())?;
        Ok(())
    }

    fn is_source_file(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}
