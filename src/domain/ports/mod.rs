//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod installer;
pub mod sync_events;

pub use installer::PackageInstaller;
pub use sync_events::{NoopEventSink, SyncEvent, SyncEventSink};
