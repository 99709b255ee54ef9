//! Per-package mirroring
//!
//! Applies one filesystem change in a source package to its installed copy.
//! Kept free of any watcher so it can be driven directly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;
use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind};

use crate::domain::ports::{SyncEvent, SyncEventSink};
use crate::domain::value_objects::{RemovalProtection, WatchMatcher};
use crate::error::SyncError;
use crate::infrastructure::layout::to_slash;

/// What happened to one changed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorAction {
    Copied(String),
    Removed(String),
    /// Removal held back by the protection window
    Suppressed(String),
    /// Outside the package or not part of the watch set
    Ignored,
    Failed(String),
}

pub struct PackageMirror {
    package: String,
    source_root: PathBuf,
    dest_root: PathBuf,
    manifest_file: String,
    matcher: WatchMatcher,
    protection: Arc<RemovalProtection>,
    events: Arc<dyn SyncEventSink>,
}

impl PackageMirror {
    pub fn new(
        package: impl Into<String>,
        source_root: PathBuf,
        dest_root: PathBuf,
        manifest_file: impl Into<String>,
        matcher: WatchMatcher,
        protection: Arc<RemovalProtection>,
        events: Arc<dyn SyncEventSink>,
    ) -> Self {
        Self {
            package: package.into(),
            source_root,
            dest_root,
            manifest_file: manifest_file.into(),
            matcher,
            protection,
            events,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Handle a raw watcher event.
    pub fn handle_event(&self, event: &Event) -> Vec<MirrorAction> {
        // Reads (including our own) must not trigger copies.
        if let EventKind::Access(kind) = event.kind {
            if kind != AccessKind::Close(AccessMode::Write) {
                return Vec::new();
            }
        }
        event
            .paths
            .iter()
            .flat_map(|path| self.sync_path(path))
            .collect()
    }

    /// Bring the installed copy of `path` in line with the source.
    ///
    /// Decided by the current state on disk rather than by event kind, so
    /// coalesced or reordered notifications still converge.
    pub fn sync_path(&self, path: &Path) -> Vec<MirrorAction> {
        let Some(rel) = self.relative(path) else {
            return vec![MirrorAction::Ignored];
        };

        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => self.copy_dir(path),
            Ok(_) => vec![self.copy(path, &rel)],
            Err(e) if e.kind() == io::ErrorKind::NotFound => vec![self.remove(&rel)],
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot stat changed path");
                vec![MirrorAction::Ignored]
            }
        }
    }

    fn relative(&self, path: &Path) -> Option<PathBuf> {
        let rel = path.strip_prefix(&self.source_root).ok()?;
        if rel.as_os_str().is_empty() {
            return None;
        }
        Some(rel.to_path_buf())
    }

    fn copy(&self, source: &Path, rel: &Path) -> MirrorAction {
        if !self.matcher.is_watched(rel, false) {
            return MirrorAction::Ignored;
        }
        let shown = to_slash(rel);
        let dest = self.dest_root.join(rel);

        let result = match dest.parent() {
            Some(parent) => fs::create_dir_all(parent),
            None => Ok(()),
        }
        .and_then(|_| fs::copy(source, &dest));

        if let Err(source) = result {
            let err = SyncError::CopyFailed {
                path: dest,
                source,
            };
            return self.fail(err);
        }

        // Output from the build is arriving; removals are trustworthy again.
        if shown != self.manifest_file && self.protection.is_active() {
            self.protection.lift();
        }

        tracing::debug!(package = %self.package, path = %shown, "copied");
        self.events.on_event(SyncEvent::FileCopied {
            package: self.package.clone(),
            path: shown.clone(),
        });
        MirrorAction::Copied(shown)
    }

    fn copy_dir(&self, dir: &Path) -> Vec<MirrorAction> {
        WalkBuilder::new(dir)
            .standard_filters(false)
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .filter_map(|entry| {
                let rel = self.relative(entry.path())?;
                Some(self.copy(entry.path(), &rel))
            })
            .collect()
    }

    fn remove(&self, rel: &Path) -> MirrorAction {
        // A deleted directory no longer says whether it was one.
        if !self.matcher.is_watched(rel, false) && !self.matcher.is_watched(rel, true) {
            return MirrorAction::Ignored;
        }
        let shown = to_slash(rel);

        if shown != self.manifest_file && self.protection.is_active() {
            tracing::debug!(package = %self.package, path = %shown, "removal suppressed");
            self.events.on_event(SyncEvent::RemovalSuppressed {
                package: self.package.clone(),
                path: shown.clone(),
            });
            return MirrorAction::Suppressed(shown);
        }

        let dest = self.dest_root.join(rel);
        let result = match fs::symlink_metadata(&dest) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&dest),
            Ok(_) => fs::remove_file(&dest),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::debug!(package = %self.package, path = %shown, "removed");
                self.events.on_event(SyncEvent::FileRemoved {
                    package: self.package.clone(),
                    path: shown.clone(),
                });
                MirrorAction::Removed(shown)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => MirrorAction::Ignored,
            Err(source) => self.fail(SyncError::RemoveFailed { path: dest, source }),
        }
    }

    fn fail(&self, err: SyncError) -> MirrorAction {
        tracing::warn!(package = %self.package, error = %err, "sync failed");
        let message = err.to_string();
        self.events.on_event(SyncEvent::SyncError {
            package: self.package.clone(),
            message: message.clone(),
        });
        MirrorAction::Failed(message)
    }
}
