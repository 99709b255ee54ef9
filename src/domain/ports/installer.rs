//! Package installer port
//!
//! Abstracts the external install primitive: turning a package directory
//! into a distributable archive, and installing a set of archives into the
//! consumer's dependency directory without recording them as dependencies.
//!
//! Implementations:
//! - `NpmInstaller` - `npm pack` / `npm install --no-save`
//! - test doubles that record invocations

use std::path::{Path, PathBuf};

use crate::error::SyncResult;

pub trait PackageInstaller: Send + Sync {
    /// Pack `package_dir` into an archive inside `destination`.
    ///
    /// Returns the path of the created archive.
    fn pack(&self, package_dir: &Path, destination: &Path) -> SyncResult<PathBuf>;

    /// Install all `archives` into `consumer_root` in one invocation.
    ///
    /// The primitive may prune locally installed packages that are not part
    /// of the request, so callers must always pass the complete set.
    fn install(&self, consumer_root: &Path, archives: &[PathBuf]) -> SyncResult<()>;
}
