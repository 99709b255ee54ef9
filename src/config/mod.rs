//! Configuration module for synec
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SYNEC_*)
//! 3. Project config (`synec.toml` in the consumer root)
//! 4. User config (~/.config/synec/config.toml)
//! 5. Built-in defaults (lowest priority)
//!
//! After loading, values change only through the validated setters on
//! [`Config`].

mod loader;
mod types;

pub use loader::{ConfigWarning, PROJECT_CONFIG_FILE};
pub use types::{
    Config, InstallConfig, PackageConfig, RunConfig, WatchConfig, MAX_REMOVAL_PROTECTION,
};
