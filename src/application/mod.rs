//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, value objects, ports)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `InstallUseCase` - Batch reinstall of stale local references
//! - `WatchUseCase` - Live mirroring of source packages into installed copies
//! - `ScriptRunner` - Build/watch scripts of source packages
//! - `resolve_watch_set` - Which files of a package are mirrored

pub mod context;
pub mod install;
pub mod scripts;
pub mod watch;
pub mod watch_set;

pub use context::SyncContext;
pub use install::{InstallOutcome, InstallUseCase};
pub use scripts::{strip_ansi, ScriptHandle, ScriptRunner};
pub use watch::{MirrorAction, PackageMirror, WatchSession, WatchUseCase};
pub use watch_set::resolve_watch_set;
