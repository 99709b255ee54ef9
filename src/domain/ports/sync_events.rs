//! Sync Event Port
//!
//! Provides an observable interface for install and watch operations.
//! Enables progress reporting, NDJSON event streams, and testing.

use serde::Serialize;

/// Event emitted by the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// A referenced package was excluded from installation
    PackageInvalid { path: String },
    /// Batch install started (one per batch)
    InstallStarted { packages: usize },
    /// Every installed copy was already up to date
    InstallSkipped { packages: usize },
    /// Batch install finished
    InstallComplete { packages: usize },
    /// Batch install failed
    InstallFailed { message: String },
    /// A package script was launched
    ScriptStarted { package: String, command: String },
    /// One line of output from a watched script
    ScriptOutput { package: String, line: String },
    /// Live sync started for a package
    WatchStarted { package: String, source: String },
    FileCopied { package: String, path: String },
    FileRemoved { package: String, path: String },
    /// A removal was not propagated because a build just started
    RemovalSuppressed { package: String, path: String },
    /// A single file operation failed; the watch continues
    SyncError { package: String, message: String },
    Shutdown,
}

impl SyncEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Trait for receiving sync events
///
/// Implementations can be:
/// - the CLI renderer (text or NDJSON)
/// - `NoopEventSink` for silent operation
/// - any `Fn(SyncEvent) + Send + Sync` closure
pub trait SyncEventSink: Send + Sync {
    fn on_event(&self, event: SyncEvent);
}

impl<F> SyncEventSink for F
where
    F: Fn(SyncEvent) + Send + Sync,
{
    fn on_event(&self, event: SyncEvent) {
        self(event)
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl SyncEventSink for NoopEventSink {
    fn on_event(&self, _event: SyncEvent) {}
}
