//! Legacy ignore file value object
//!
//! Handles loading the `.npmignore` patterns a package publishes with when it
//! declares no `files` list. Patterns use gitignore semantics.

use ignore::gitignore::GitignoreBuilder;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum file size for the ignore file (64KB)
const MAX_FILE_SIZE: u64 = 65536;

/// Maximum number of patterns allowed
const MAX_PATTERNS: usize = 1000;

/// Patterns loaded from a package's legacy ignore file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyIgnore {
    patterns: Vec<String>,
}

impl LegacyIgnore {
    /// Create an empty pattern set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load patterns from `file_name` in the given package directory.
    ///
    /// Returns `Ok(empty)` if the file doesn't exist.
    pub fn load(package_root: &Path, file_name: &str) -> Result<Self, IgnoreError> {
        let ignore_path = package_root.join(file_name);

        if !ignore_path.is_file() {
            return Ok(Self::empty());
        }

        let metadata = fs::metadata(&ignore_path).map_err(IgnoreError::Io)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(IgnoreError::FileTooLarge {
                path: ignore_path,
                size: metadata.len(),
                limit: MAX_FILE_SIZE,
            });
        }

        let content = fs::read_to_string(&ignore_path).map_err(IgnoreError::Io)?;
        Self::from_content(&ignore_path, &content)
    }

    /// Parse patterns from string content.
    pub fn from_content(source_path: &Path, content: &str) -> Result<Self, IgnoreError> {
        // Only used to validate syntax; matching happens in `WatchMatcher`.
        let mut builder = GitignoreBuilder::new("");
        let mut patterns = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if patterns.len() == MAX_PATTERNS {
                return Err(IgnoreError::TooManyPatterns {
                    path: source_path.to_path_buf(),
                    count: patterns.len() + 1,
                    limit: MAX_PATTERNS,
                });
            }

            if let Err(e) = builder.add_line(Some(source_path.to_path_buf()), trimmed) {
                return Err(IgnoreError::InvalidPattern {
                    path: source_path.to_path_buf(),
                    line: line_num + 1,
                    pattern: trimmed.to_string(),
                    message: e.to_string(),
                });
            }

            patterns.push(trimmed.to_string());
        }

        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn into_patterns(self) -> Vec<String> {
        self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Errors that can occur when loading the ignore file.
#[derive(Debug)]
pub enum IgnoreError {
    /// The ignore file exceeds the size limit.
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
    /// Too many patterns in the file.
    TooManyPatterns {
        path: PathBuf,
        count: usize,
        limit: usize,
    },
    /// A pattern has invalid syntax.
    InvalidPattern {
        path: PathBuf,
        line: usize,
        pattern: String,
        message: String,
    },
    /// IO error reading the file.
    Io(std::io::Error),
}

impl fmt::Display for IgnoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileTooLarge { path, size, limit } => {
                write!(
                    f,
                    "{} exceeds {}KB limit ({} bytes)",
                    path.display(),
                    limit / 1024,
                    size
                )
            }
            Self::TooManyPatterns { path, count, limit } => {
                write!(
                    f,
                    "{} has {} patterns, exceeds {} limit",
                    path.display(),
                    count,
                    limit
                )
            }
            Self::InvalidPattern {
                path,
                line,
                pattern,
                message,
            } => {
                write!(
                    f,
                    "Invalid pattern at {}:{}: '{}' - {}",
                    path.display(),
                    line,
                    pattern,
                    message
                )
            }
            Self::Io(e) => write!(f, "IO error reading ignore file: {}", e),
        }
    }
}

impl std::error::Error for IgnoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}
