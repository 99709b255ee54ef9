//! Consumer Layout
//!
//! Resolves where things live on disk: source packages relative to the
//! consumer root, installed copies inside the dependency directory.

use std::path::{Component, Path, PathBuf};

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerLayout {
    root: PathBuf,
    dependency_dir: String,
    manifest_file: String,
    lock_file: String,
}

impl ConsumerLayout {
    /// A relative `root` is resolved against the current directory, since
    /// package paths are handed to tools that run elsewhere.
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            root,
            dependency_dir: config.package.dependency_dir.clone(),
            manifest_file: config.package.manifest_file.clone(),
            lock_file: config.install.lock_file.clone(),
        }
    }

    /// Consumer project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_file(&self) -> &str {
        &self.manifest_file
    }

    pub fn dependency_dir_name(&self) -> &str {
        &self.dependency_dir
    }

    /// Absolute (or root-relative) directory of a source package
    pub fn package_dir(&self, package_path: &Path) -> PathBuf {
        normalize(&self.root.join(package_path))
    }

    pub fn manifest_path(&self, package_path: &Path) -> PathBuf {
        self.package_dir(package_path).join(&self.manifest_file)
    }

    /// The consumer's dependency directory
    pub fn dependency_dir(&self) -> PathBuf {
        self.root.join(&self.dependency_dir)
    }

    /// Where the installed copy of `package_name` lives
    pub fn installed_dir(&self, package_name: &str) -> PathBuf {
        self.dependency_dir().join(package_name)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dependency_dir().join(&self.lock_file)
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Render a relative path with `/` separators, dropping `.` and `..`.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
