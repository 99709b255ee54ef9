//! Error types for synec
//!
//! Uses `thiserror` for library errors. Only `InstallFailed`, `PackFailed`,
//! `Lock` and `Config` are meant to reach the caller; the rest are logged at
//! the call site and the engine moves on to the next package or file.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for synec operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Main error type for synec operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// Manifest file missing or not valid JSON
    #[error("unable to load manifest {path}: {message}")]
    ManifestUnreadable { path: PathBuf, message: String },

    /// Package lacks the name or version needed for installation
    #[error("package in {path} is missing a name or version")]
    PackageInvalid { path: PathBuf },

    /// Packing a source package into an archive failed
    #[error("packing {path} failed: {message}")]
    PackFailed { path: PathBuf, message: String },

    /// The install command exited unsuccessfully
    #[error("install failed ({status}): {stderr}")]
    InstallFailed { status: String, stderr: String },

    /// Copying a file into the installed copy failed
    #[error("copying {path} failed: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing a file from the installed copy failed
    #[error("removing {path} failed: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A filesystem watch could not be opened
    #[error("watching {path} failed: {message}")]
    Watch { path: PathBuf, message: String },

    /// A package script could not be run or exited unsuccessfully
    #[error("script '{script}' in {path} failed: {message}")]
    ScriptFailed {
        path: PathBuf,
        script: String,
        message: String,
    },

    /// The per-consumer install lock could not be taken
    #[error("unable to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
