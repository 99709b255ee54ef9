//! Watch Use Case implementation

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::application::context::SyncContext;
use crate::application::watch_set::resolve_watch_set;
use crate::domain::ports::SyncEvent;
use crate::error::{SyncError, SyncResult};

use super::mirror::PackageMirror;
use super::session::WatchSession;

/// How often an idle dispatcher checks whether the session was stopped
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Watch Use Case
///
/// Starts live mirroring of source packages into their installed copies.
/// Must only run after the installed copies exist.
pub struct WatchUseCase {
    ctx: SyncContext,
}

impl WatchUseCase {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    /// Start watching every package (non-blocking).
    ///
    /// A package that cannot be watched is logged and left out; the others
    /// still start.
    pub fn start(&self, package_paths: &[PathBuf]) -> SyncResult<WatchSession> {
        let stopped = Arc::new(AtomicBool::new(false));
        let mut names = Vec::new();
        let mut watchers = Vec::new();
        let mut dispatchers = Vec::new();

        for path in package_paths {
            let Some(mirror) = self.mirror_for(path) else {
                continue;
            };
            let (tx, rx) = channel();

            let watcher = match open_watcher(mirror.source_root(), move |res| {
                let _ = tx.send(res);
            }) {
                Ok(watcher) => watcher,
                Err(e) => {
                    tracing::warn!(package = %mirror.package(), error = %e, "not watching package");
                    continue;
                }
            };

            let name = mirror.package().to_string();
            let source = mirror.source_root().display().to_string();
            dispatchers.push(spawn_dispatcher(mirror, rx, stopped.clone())?);
            watchers.push(watcher);

            tracing::info!(package = %name, source = %source, "watching");
            self.ctx.emit(SyncEvent::WatchStarted {
                package: name.clone(),
                source,
            });
            names.push(name);
        }

        Ok(WatchSession::new(
            names,
            watchers,
            dispatchers,
            stopped,
            self.ctx.events.clone(),
        ))
    }

    fn mirror_for(&self, package_path: &Path) -> Option<PackageMirror> {
        let rules = resolve_watch_set(&self.ctx, package_path);
        if rules.name.is_empty() {
            tracing::warn!(
                path = %package_path.display(),
                "package has no usable manifest, not watching"
            );
            return None;
        }

        let source_dir = self.ctx.source_dir(package_path);
        if !source_dir.is_dir() {
            tracing::warn!(path = %source_dir.display(), "source directory missing, not watching");
            return None;
        }
        // Watchers report resolved paths (e.g. /private/var on macOS).
        let source_root = source_dir.canonicalize().unwrap_or(source_dir);
        let dest_root = self.ctx.layout.installed_dir(&rules.name);

        Some(PackageMirror::new(
            rules.name.clone(),
            source_root.clone(),
            dest_root,
            self.ctx.layout.manifest_file(),
            rules.matcher(&source_root),
            self.ctx.protection.clone(),
            self.ctx.events.clone(),
        ))
    }
}

fn open_watcher<F>(root: &Path, handler: F) -> SyncResult<RecommendedWatcher>
where
    F: notify::EventHandler,
{
    let watch_error = |e: notify::Error| SyncError::Watch {
        path: root.to_path_buf(),
        message: e.to_string(),
    };

    let mut watcher =
        RecommendedWatcher::new(handler, NotifyConfig::default()).map_err(watch_error)?;
    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(watch_error)?;
    Ok(watcher)
}

/// Events of one package are handled on one thread, in arrival order.
fn spawn_dispatcher(
    mirror: PackageMirror,
    rx: Receiver<notify::Result<Event>>,
    stopped: Arc<AtomicBool>,
) -> SyncResult<JoinHandle<()>> {
    let handle = std::thread::Builder::new()
        .name(format!("synec-watch-{}", mirror.package()))
        .spawn(move || {
            while !stopped.load(Ordering::SeqCst) {
                match rx.recv_timeout(POLL_INTERVAL) {
                    Ok(Ok(event)) => {
                        mirror.handle_event(&event);
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(package = %mirror.package(), error = %e, "watch error");
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        })?;
    Ok(handle)
}
