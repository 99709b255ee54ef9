//! Recording installer double.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use synec::{PackageDescriptor, PackageInstaller, SyncError, SyncResult};

/// Packs by writing the source directory into a fake archive and installs
/// by copying that directory into `node_modules/<name>`.
#[derive(Default)]
pub struct RecordingInstaller {
    /// Package names passed to each `install` call
    batches: Mutex<Vec<Vec<String>>>,
    fail_pack_for: Option<String>,
    fail_install: bool,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_pack(name: &str) -> Self {
        Self {
            fail_pack_for: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_install() -> Self {
        Self {
            fail_install: true,
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn install_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

fn package_name(package_dir: &Path) -> SyncResult<String> {
    let manifest = fs::read_to_string(package_dir.join("package.json"))?;
    let descriptor = PackageDescriptor::from_json(&manifest).map_err(|e| SyncError::PackFailed {
        path: package_dir.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(descriptor.name().unwrap_or_default().to_string())
}

impl PackageInstaller for RecordingInstaller {
    fn pack(&self, package_dir: &Path, destination: &Path) -> SyncResult<PathBuf> {
        let name = package_name(package_dir)?;
        if self.fail_pack_for.as_deref() == Some(name.as_str()) {
            return Err(SyncError::PackFailed {
                path: package_dir.to_path_buf(),
                message: "npm ERR! pack failed".to_string(),
            });
        }
        let archive = destination.join(format!("{name}-1.0.0.tgz"));
        fs::write(&archive, package_dir.to_string_lossy().as_bytes())?;
        Ok(archive)
    }

    fn install(&self, consumer_root: &Path, archives: &[PathBuf]) -> SyncResult<()> {
        let mut batch = Vec::new();
        let mut sources = Vec::new();
        for archive in archives {
            let source = PathBuf::from(fs::read_to_string(archive)?);
            batch.push(package_name(&source)?);
            sources.push(source);
        }
        self.batches.lock().unwrap().push(batch.clone());

        if self.fail_install {
            return Err(SyncError::InstallFailed {
                status: "exit status: 1".to_string(),
                stderr: "npm ERR! ERESOLVE".to_string(),
            });
        }

        for (name, source) in batch.iter().zip(&sources) {
            let dest = consumer_root.join("node_modules").join(name);
            if dest.exists() {
                fs::remove_dir_all(&dest)?;
            }
            copy_tree(source, &dest)?;
        }
        Ok(())
    }
}

/// Recursive copy skipping nested `node_modules`.
fn copy_tree(source: &Path, dest: &Path) -> SyncResult<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            if entry.file_name() != "node_modules" {
                copy_tree(&entry.path(), &target)?;
            }
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
