//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `layout` - Where source packages and installed copies live
//! - `manifest` - Descriptor loading and memoization
//! - `fingerprint` - Content hashing and marker files
//! - `lock` - Per-consumer install lock
//! - `npm` - The npm-backed `PackageInstaller`

pub mod fingerprint;
pub mod layout;
pub mod lock;
pub mod manifest;
pub mod npm;

// Re-export for convenience
pub use fingerprint::FingerprintStore;
pub use layout::ConsumerLayout;
pub use lock::InstallLock;
pub use manifest::ManifestCache;
pub use npm::NpmInstaller;
