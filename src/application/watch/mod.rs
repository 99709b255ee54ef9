//! Live Synchronization
//!
//! Mirrors file additions, changes and removals from each source package
//! into its installed copy while a session is running.
//!
//! ## Architecture
//!
//! - `WatchUseCase` - Opens one recursive watcher per package
//! - `PackageMirror` - Applies a single change to the installed copy
//! - `WatchSession` - Handle that stops everything on `stop()` or drop
//!
//! ## Usage
//!
//! ```ignore
//! let session = WatchUseCase::new(ctx).start(&paths)?;
//! // ... later, from any thread
//! session.stop();
//! ```

mod mirror;
mod session;
mod use_case;


pub use mirror::{MirrorAction, PackageMirror};
pub use session::WatchSession;
pub use use_case::WatchUseCase;
