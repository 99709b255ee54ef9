//! Manifest Repository
//!
//! Loads package descriptors from disk and memoizes them for the lifetime of
//! the process. A bypass mode re-reads on every lookup, for tests that edit
//! manifests between calls.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::domain::entities::PackageDescriptor;
use crate::error::{SyncError, SyncResult};

use super::layout::{normalize, ConsumerLayout};

pub struct ManifestCache {
    layout: ConsumerLayout,
    bypass: bool,
    entries: Mutex<HashMap<PathBuf, Arc<PackageDescriptor>>>,
}

impl ManifestCache {
    /// Create a memoizing cache
    pub fn new(layout: ConsumerLayout) -> Self {
        Self {
            layout,
            bypass: false,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create a cache that always reads from disk
    pub fn bypass(layout: ConsumerLayout) -> Self {
        Self {
            bypass: true,
            ..Self::new(layout)
        }
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypass
    }

    /// Read and parse the manifest of the package at `package_path`
    /// (relative to the consumer root; an empty path is the consumer).
    pub fn read_manifest(&self, package_path: &Path) -> SyncResult<PackageDescriptor> {
        let manifest_path = self.layout.manifest_path(package_path);
        let content =
            fs::read_to_string(&manifest_path).map_err(|e| SyncError::ManifestUnreadable {
                path: manifest_path.clone(),
                message: e.to_string(),
            })?;

        PackageDescriptor::from_json(&content).map_err(|e| SyncError::ManifestUnreadable {
            path: manifest_path,
            message: e.to_string(),
        })
    }

    /// Cached descriptor for `package_path`.
    ///
    /// An unreadable manifest yields an empty descriptor, which callers treat
    /// as an unusable package.
    pub fn get(&self, package_path: &Path) -> Arc<PackageDescriptor> {
        let key = normalize(package_path);

        if !self.bypass {
            if let Some(cached) = self.lock().get(&key) {
                return Arc::clone(cached);
            }
        }

        let descriptor = match self.read_manifest(&key) {
            Ok(descriptor) => Arc::new(descriptor),
            Err(e) => {
                tracing::warn!("{e}");
                Arc::new(PackageDescriptor::default())
            }
        };

        if self.bypass {
            return descriptor;
        }

        // Another thread may have raced us; keep whichever landed first.
        Arc::clone(self.lock().entry(key).or_insert(descriptor))
    }

    /// The consumer project's own descriptor
    pub fn consumer(&self) -> Arc<PackageDescriptor> {
        self.get(Path::new(""))
    }

    /// Drop one cached entry
    pub fn invalidate(&self, package_path: &Path) {
        self.lock().remove(&normalize(package_path));
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Arc<PackageDescriptor>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
