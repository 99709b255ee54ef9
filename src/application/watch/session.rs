//! Watch session handle

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use notify::RecommendedWatcher;

use crate::domain::ports::{SyncEvent, SyncEventSink};

/// A running live sync over a set of packages.
///
/// Holds one filesystem watcher and one dispatcher thread per package.
/// Dropping the session stops it.
pub struct WatchSession {
    packages: Vec<String>,
    watchers: Mutex<Vec<RecommendedWatcher>>,
    dispatchers: Mutex<Vec<JoinHandle<()>>>,
    stopped: Arc<AtomicBool>,
    events: Arc<dyn SyncEventSink>,
}

impl WatchSession {
    pub(super) fn new(
        packages: Vec<String>,
        watchers: Vec<RecommendedWatcher>,
        dispatchers: Vec<JoinHandle<()>>,
        stopped: Arc<AtomicBool>,
        events: Arc<dyn SyncEventSink>,
    ) -> Self {
        Self {
            packages,
            watchers: Mutex::new(watchers),
            dispatchers: Mutex::new(dispatchers),
            stopped,
            events,
        }
    }

    /// Names of the packages being mirrored
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst)
    }

    /// Release every watch and wait for the dispatchers to finish.
    ///
    /// Calling it again is a no-op.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }

        let watchers = std::mem::take(&mut *self.watchers.lock().unwrap_or_else(|e| e.into_inner()));
        drop(watchers);

        let dispatchers =
            std::mem::take(&mut *self.dispatchers.lock().unwrap_or_else(|e| e.into_inner()));
        for handle in dispatchers {
            if handle.join().is_err() {
                tracing::warn!("watch dispatcher panicked");
            }
        }

        tracing::info!(packages = self.packages.len(), "watch stopped");
        self.events.on_event(SyncEvent::Shutdown);
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.stop();
    }
}
