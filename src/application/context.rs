//! Shared state for the use cases
//!
//! Every use case works against the same consumer layout, manifest cache,
//! fingerprint store, event sink and removal-protection flag. The context
//! bundles them behind cheap clones so watch threads can own a copy.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::domain::entities::PackageDescriptor;
use crate::domain::ports::{SyncEvent, SyncEventSink};
use crate::domain::value_objects::RemovalProtection;
use crate::error::SyncResult;
use crate::infrastructure::{ConsumerLayout, FingerprintStore, ManifestCache};

#[derive(Clone)]
pub struct SyncContext {
    pub config: Arc<Config>,
    pub layout: ConsumerLayout,
    pub manifests: Arc<ManifestCache>,
    pub fingerprints: FingerprintStore,
    pub protection: Arc<RemovalProtection>,
    pub events: Arc<dyn SyncEventSink>,
}

impl SyncContext {
    pub fn new(root: impl Into<PathBuf>, config: Config, events: Arc<dyn SyncEventSink>) -> Self {
        let layout = ConsumerLayout::new(root, &config);
        Self {
            manifests: Arc::new(ManifestCache::new(layout.clone())),
            fingerprints: FingerprintStore::new(&config),
            protection: Arc::new(RemovalProtection::new(config.removal_protection())),
            config: Arc::new(config),
            layout,
            events,
        }
    }

    /// Same context, but manifests are re-read on every lookup
    pub fn bypassing_manifest_cache(mut self) -> Self {
        self.manifests = Arc::new(ManifestCache::bypass(self.layout.clone()));
        self
    }

    pub fn emit(&self, event: SyncEvent) {
        self.events.on_event(event);
    }

    pub fn descriptor(&self, package_path: &Path) -> Arc<PackageDescriptor> {
        self.manifests.get(package_path)
    }

    /// Directory of the source package
    pub fn source_dir(&self, package_path: &Path) -> PathBuf {
        self.layout.package_dir(package_path)
    }

    /// Installed copy of the package, when its descriptor names it
    pub fn installed_dir(&self, package_path: &Path) -> Option<PathBuf> {
        self.descriptor(package_path)
            .name()
            .map(|name| self.layout.installed_dir(name))
    }

    /// Whether the package can be packed and installed.
    ///
    /// A package without name or version is reported once per call and
    /// left out; the rest of the batch is unaffected.
    pub fn is_installable(&self, package_path: &Path) -> bool {
        if self.descriptor(package_path).is_installable() {
            return true;
        }
        tracing::warn!(
            path = %package_path.display(),
            "package needs both a name and a version to be installed"
        );
        self.emit(SyncEvent::PackageInvalid {
            path: package_path.display().to_string(),
        });
        false
    }

    /// True when the installed copy is missing or its marker differs from
    /// the current source fingerprint.
    pub fn needs_update(&self, package_path: &Path) -> SyncResult<bool> {
        let Some(installed) = self.installed_dir(package_path) else {
            return Ok(true);
        };
        if !installed.is_dir() {
            tracing::debug!(path = %package_path.display(), "no installed copy");
            return Ok(true);
        }

        let current = self.fingerprints.compute(&self.source_dir(package_path))?;
        let stale = match self.fingerprints.stored(&installed)? {
            Some(stored) => stored != current,
            None => true,
        };
        tracing::debug!(path = %package_path.display(), stale, "checked fingerprint");
        Ok(stale)
    }

    /// Store the current source fingerprint in the installed copy.
    pub fn record_hash(&self, package_path: &Path) -> SyncResult<()> {
        let Some(installed) = self.installed_dir(package_path) else {
            tracing::warn!(path = %package_path.display(), "cannot record hash of unnamed package");
            return Ok(());
        };
        if !installed.is_dir() {
            tracing::warn!(
                path = %package_path.display(),
                installed = %installed.display(),
                "installed copy missing, hash not recorded"
            );
            return Ok(());
        }

        let hash = self.fingerprints.compute(&self.source_dir(package_path))?;
        self.fingerprints.write(&installed, &hash)
    }
}
