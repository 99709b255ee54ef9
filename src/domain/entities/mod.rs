//! Domain Entities
//!
//! - `PackageDescriptor` - a package manifest as the engine sees it

mod descriptor;

pub use descriptor::PackageDescriptor;
