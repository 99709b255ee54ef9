//! Synec - local package synchronization for npm projects
//!
//! Synec keeps packages that are developed next to a consuming project
//! mirrored into the consumer's `node_modules`, without publishing them.
//! It reinstalls a package only when its content fingerprint changed, and
//! can keep mirroring file changes while the packages are being edited.

pub mod application;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{InstallOutcome, MirrorAction, ScriptHandle, WatchSession};
pub use config::{Config, ConfigWarning};
pub use domain::entities::PackageDescriptor;
pub use domain::ports::{NoopEventSink, PackageInstaller, SyncEvent, SyncEventSink};
pub use domain::value_objects::{ContentHash, RemovalProtection, WatchRuleSet};
pub use engine::Engine;
pub use error::{SyncError, SyncResult};
pub use infrastructure::NpmInstaller;
