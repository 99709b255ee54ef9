//! Removal protection window
//!
//! Watched build tools usually clean their output directory when they start.
//! Those deletions must not be mirrored into the installed copy, otherwise the
//! consumer briefly loses files it still needs.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default length of the protection window.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(2000);

/// Shared flag suppressing removals for a short window.
///
/// One instance is shared by every synchronizer of an engine. Expiry is
/// evaluated lazily, so no timer thread is needed.
#[derive(Debug)]
pub struct RemovalProtection {
    window: Duration,
    until: Mutex<Option<Instant>>,
}

impl Default for RemovalProtection {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl RemovalProtection {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            until: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Start (or restart) the window from now.
    pub fn arm(&self) {
        *self.lock() = Some(Instant::now() + self.window);
    }

    /// End the window early.
    pub fn lift(&self) {
        *self.lock() = None;
    }

    pub fn is_active(&self) -> bool {
        let mut until = self.lock();
        match *until {
            Some(deadline) if Instant::now() < deadline => true,
            Some(_) => {
                *until = None;
                false
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        // The guarded value is a plain deadline; a poisoned lock still holds
        // a usable one.
        self.until.lock().unwrap_or_else(|e| e.into_inner())
    }
}
