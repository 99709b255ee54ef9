//! Install Use Case
//!
//! Reinstalls locally referenced packages into the consumer:
//! 1. Drop packages that cannot be installed (no name or version)
//! 2. Check every remaining package for staleness, concurrently
//! 3. If anything is stale, pack *every* installable package and install
//!    the archives with a single installer invocation
//! 4. Record fresh fingerprints, only after the install succeeded
//!
//! The installer may prune local packages missing from its request, so a
//! partial batch is never issued.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::domain::ports::{PackageInstaller, SyncEvent};
use crate::error::{SyncError, SyncResult};
use crate::infrastructure::InstallLock;

use super::context::SyncContext;

/// What a batch install did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// No installable package was referenced
    NothingToInstall,
    /// Every installed copy already matched its source
    UpToDate { packages: Vec<PathBuf> },
    /// The batch was reinstalled
    Installed { packages: Vec<PathBuf> },
}

impl InstallOutcome {
    pub fn installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }

    pub fn packages(&self) -> &[PathBuf] {
        match self {
            Self::NothingToInstall => &[],
            Self::UpToDate { packages } | Self::Installed { packages } => packages,
        }
    }
}

pub struct InstallUseCase {
    ctx: SyncContext,
    installer: Arc<dyn PackageInstaller>,
}

impl InstallUseCase {
    pub fn new(ctx: SyncContext, installer: Arc<dyn PackageInstaller>) -> Self {
        Self { ctx, installer }
    }

    pub fn execute(&self, package_paths: &[PathBuf]) -> SyncResult<InstallOutcome> {
        let packages: Vec<PathBuf> = package_paths
            .iter()
            .filter(|path| self.ctx.is_installable(path))
            .cloned()
            .collect();

        if packages.is_empty() {
            tracing::info!("no installable local references");
            return Ok(InstallOutcome::NothingToInstall);
        }

        if !self.any_stale(&packages) {
            tracing::info!(packages = packages.len(), "local references are up to date");
            self.ctx.emit(SyncEvent::InstallSkipped {
                packages: packages.len(),
            });
            return Ok(InstallOutcome::UpToDate { packages });
        }

        self.ctx.emit(SyncEvent::InstallStarted {
            packages: packages.len(),
        });

        match self.install_batch(&packages) {
            Ok(()) => {
                for path in &packages {
                    if let Err(e) = self.ctx.record_hash(path) {
                        tracing::warn!(path = %path.display(), error = %e, "failed to record hash");
                    }
                }
                self.ctx.emit(SyncEvent::InstallComplete {
                    packages: packages.len(),
                });
                Ok(InstallOutcome::Installed { packages })
            }
            Err(e) => {
                self.ctx.emit(SyncEvent::InstallFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Hash all packages in parallel and wait for every result.
    fn any_stale(&self, packages: &[PathBuf]) -> bool {
        let results: Vec<bool> = std::thread::scope(|scope| {
            let handles: Vec<_> = packages
                .iter()
                .map(|path| scope.spawn(move || self.is_stale(path)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or(true))
                .collect()
        });
        results.into_iter().any(|stale| stale)
    }

    fn is_stale(&self, path: &Path) -> bool {
        match self.ctx.needs_update(path) {
            Ok(stale) => stale,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "hashing failed, reinstalling");
                true
            }
        }
    }

    fn install_batch(&self, packages: &[PathBuf]) -> SyncResult<()> {
        let _lock = InstallLock::acquire(&self.ctx.layout.lock_path())?;

        // Archives live only as long as this directory.
        let staging = TempDir::new()?;
        let mut archives = Vec::with_capacity(packages.len());
        for path in packages {
            let source = self.ctx.source_dir(path);
            tracing::debug!(path = %source.display(), "packing");
            archives.push(self.installer.pack(&source, staging.path())?);
        }

        tracing::info!(archives = archives.len(), "installing local references");
        self.installer.install(self.ctx.layout.root(), &archives)
    }
}
