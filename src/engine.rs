//! Engine facade
//!
//! The library entry point. Owns the configuration, manifest cache,
//! installer, event sink and removal-protection flag, and exposes the
//! operations the CLI composes:
//!
//! ```ignore
//! let engine = Engine::with_npm(root, config, Arc::new(NoopEventSink));
//! if let Some(paths) = engine.local_references() {
//!     engine.install_without_save(&paths)?;
//!     let session = engine.watch_references(&paths)?;
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::{
    resolve_watch_set, InstallOutcome, InstallUseCase, ScriptHandle, ScriptRunner, SyncContext,
    WatchSession, WatchUseCase,
};
use crate::config::Config;
use crate::domain::ports::{PackageInstaller, SyncEventSink};
use crate::domain::value_objects::{RemovalProtection, WatchRuleSet};
use crate::error::SyncResult;
use crate::infrastructure::{ConsumerLayout, ManifestCache, NpmInstaller};

pub struct Engine {
    ctx: SyncContext,
    installer: Arc<dyn PackageInstaller>,
    npm: NpmInstaller,
}

impl Engine {
    /// Create an engine with a custom installer (fakes in tests).
    pub fn new(
        root: impl Into<PathBuf>,
        config: Config,
        installer: Arc<dyn PackageInstaller>,
        events: Arc<dyn SyncEventSink>,
    ) -> Self {
        let npm = NpmInstaller::new(config.install.npm.clone());
        Self {
            ctx: SyncContext::new(root, config, events),
            installer,
            npm,
        }
    }

    /// Create an engine that installs through the configured npm program.
    pub fn with_npm(
        root: impl Into<PathBuf>,
        config: Config,
        events: Arc<dyn SyncEventSink>,
    ) -> Self {
        let npm = NpmInstaller::new(config.install.npm.clone());
        Self::new(root, config, Arc::new(npm), events)
    }

    /// Re-read manifests on every lookup instead of memoizing them.
    pub fn bypass_manifest_cache(mut self) -> Self {
        self.ctx = self.ctx.bypassing_manifest_cache();
        self
    }

    pub fn config(&self) -> &Config {
        &self.ctx.config
    }

    pub fn layout(&self) -> &ConsumerLayout {
        &self.ctx.layout
    }

    pub fn manifests(&self) -> &ManifestCache {
        &self.ctx.manifests
    }

    pub fn removal_protection(&self) -> &RemovalProtection {
        &self.ctx.protection
    }

    /// Local references declared by the consumer, in declaration order.
    ///
    /// `None` means the engine has nothing to do.
    pub fn local_references(&self) -> Option<Vec<PathBuf>> {
        self.ctx.manifests.consumer().local_references()
    }

    pub fn is_installable(&self, package_path: &Path) -> bool {
        self.ctx.is_installable(package_path)
    }

    pub fn needs_update(&self, package_path: &Path) -> SyncResult<bool> {
        self.ctx.needs_update(package_path)
    }

    pub fn record_hash(&self, package_path: &Path) -> SyncResult<()> {
        self.ctx.record_hash(package_path)
    }

    /// Reinstall every installable package if any of them is stale.
    pub fn install_without_save(&self, package_paths: &[PathBuf]) -> SyncResult<InstallOutcome> {
        InstallUseCase::new(self.ctx.clone(), self.installer.clone()).execute(package_paths)
    }

    pub fn resolve_watch_set(&self, package_path: &Path) -> WatchRuleSet {
        resolve_watch_set(&self.ctx, package_path)
    }

    /// Start mirroring changes. Call only after installing.
    pub fn watch_references(&self, package_paths: &[PathBuf]) -> SyncResult<WatchSession> {
        WatchUseCase::new(self.ctx.clone()).start(package_paths)
    }

    /// Run build scripts, or start watch scripts when `watch` is set.
    pub fn run_scripts(&self, package_paths: &[PathBuf], watch: bool) -> Vec<ScriptHandle> {
        ScriptRunner::new(self.ctx.clone(), self.npm.clone()).run(package_paths, watch)
    }

    /// Install the consumer's own dependencies when they are missing.
    pub fn ensure_consumer_dependencies(&self) -> SyncResult<bool> {
        ScriptRunner::new(self.ctx.clone(), self.npm.clone())
            .ensure_dependencies(self.ctx.layout.root())
    }
}
