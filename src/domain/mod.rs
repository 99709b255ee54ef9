//! Domain Layer
//!
//! Package descriptors, watch rules, fingerprints and the ports the engine
//! talks to the outside world through.
//!
//! ## Structure
//!
//! - `entities/` - `PackageDescriptor`
//! - `value_objects/` - `ContentHash`, `WatchRuleSet`, `LegacyIgnore`, `RemovalProtection`
//! - `ports/` - `PackageInstaller`, `SyncEventSink`

pub mod entities;
pub mod ports;
pub mod value_objects;
