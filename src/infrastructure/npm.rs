//! npm Package Installer
//!
//! Shells out to the npm CLI for packing source packages, installing the
//! resulting tarballs and running package scripts.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::domain::ports::installer::PackageInstaller;
use crate::error::{SyncError, SyncResult};

/// Installer backed by the `npm` executable (or a compatible replacement)
#[derive(Debug, Clone)]
pub struct NpmInstaller {
    program: String,
}

impl NpmInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check if the executable can be started at all
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// A command for `npm <args>` running in `dir`
    pub fn command<I, S>(&self, dir: &Path, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).current_dir(dir);
        cmd
    }
}

impl Default for NpmInstaller {
    fn default() -> Self {
        Self::new("npm")
    }
}

impl PackageInstaller for NpmInstaller {
    fn pack(&self, package_dir: &Path, destination: &Path) -> SyncResult<PathBuf> {
        let pack_error = |message: String| SyncError::PackFailed {
            path: package_dir.to_path_buf(),
            message,
        };

        let output = self
            .command(destination, ["pack"])
            .arg(package_dir)
            .arg("--pack-destination")
            .arg(destination)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| pack_error(e.to_string()))?;

        if !output.status.success() {
            return Err(pack_error(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        // npm prints lifecycle output first; the tarball name is the last line.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let tarball = stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .ok_or_else(|| pack_error("no tarball name in output".to_string()))?;

        let archive = destination.join(tarball);
        if !archive.is_file() {
            return Err(pack_error(format!(
                "expected archive {} was not created",
                archive.display()
            )));
        }
        Ok(archive)
    }

    fn install(&self, consumer_root: &Path, archives: &[PathBuf]) -> SyncResult<()> {
        let output = self
            .command(consumer_root, ["install", "--no-save", "--legacy-peer-deps"])
            .args(archives)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| SyncError::InstallFailed {
                status: "not started".to_string(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(SyncError::InstallFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
