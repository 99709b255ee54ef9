//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod hash;
mod legacy_ignore;
mod removal_protection;
mod watch_rules;

pub use hash::{ContentHash, ContentHasher};
pub use legacy_ignore::{IgnoreError, LegacyIgnore};
pub use removal_protection::{RemovalProtection, DEFAULT_WINDOW};
pub use watch_rules::{
    normalize_entry_point, WatchMatcher, WatchRuleSet, DOT_DIR_PATTERN, DOT_FILE_PATTERN,
    INCLUDE_ALL,
};
