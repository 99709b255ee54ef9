//! Content Hash Value Object
//!
//! A validated, immutable hash representing the content of a source package.
//! Stored in the `.sync-hash` marker next to each installed copy.

use std::fmt;

use sha2::{Digest, Sha256};

/// Content hash value object
///
/// Wraps a SHA-256 hash string with the `sha256:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Prefix for SHA-256 hashes
    pub const PREFIX: &'static str = "sha256:";

    /// Create a new ContentHash from a raw hash string (with or without prefix)
    pub fn new(raw_hash: &str) -> Self {
        let raw_hash = raw_hash.trim();
        if raw_hash.starts_with(Self::PREFIX) {
            Self(raw_hash.to_string())
        } else {
            Self(format!("{}{}", Self::PREFIX, raw_hash))
        }
    }

    /// Create a ContentHash by computing SHA-256 of bytes
    pub fn from_bytes(content: &[u8]) -> Self {
        let hash = Sha256::digest(content);
        Self(format!("{}{:x}", Self::PREFIX, hash))
    }

    /// Get the full hash string with prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get just the hex part without prefix
    pub fn hex(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }

    /// Check if this hash matches a stored marker value (with or without prefix)
    pub fn matches_str(&self, s: &str) -> bool {
        let s = s.trim();
        if s.starts_with(Self::PREFIX) {
            self.0 == s
        } else {
            self.hex() == s
        }
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Incremental hasher over a sequence of (relative path, content) entries.
///
/// Path and content are length-prefixed so that moving bytes between a
/// file name and its content always changes the digest.
#[derive(Default)]
pub struct ContentHasher {
    inner: Sha256,
    entries: usize,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, rel_path: &str, content: &[u8]) {
        self.inner.update((rel_path.len() as u64).to_le_bytes());
        self.inner.update(rel_path.as_bytes());
        self.inner.update((content.len() as u64).to_le_bytes());
        self.inner.update(content);
        self.entries += 1;
    }

    /// Number of entries hashed so far
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn finish(self) -> ContentHash {
        ContentHash(format!("{}{:x}", ContentHash::PREFIX, self.inner.finalize()))
    }
}
