//! Configuration type definitions

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

use super::loader::{self, ConfigWarning};

/// Upper bound for the removal-protection window.
pub const MAX_REMOVAL_PROTECTION: Duration = Duration::from_secs(60);

/// Package layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    #[serde(default = "default_dependency_dir")]
    pub dependency_dir: String,

    #[serde(default = "default_marker_file")]
    pub marker_file: String,

    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,

    /// File extensions that take part in the content fingerprint
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            manifest_file: default_manifest_file(),
            dependency_dir: default_dependency_dir(),
            marker_file: default_marker_file(),
            ignore_file: default_ignore_file(),
            source_extensions: default_source_extensions(),
        }
    }
}

fn default_manifest_file() -> String {
    "package.json".to_string()
}

fn default_dependency_dir() -> String {
    "node_modules".to_string()
}

fn default_marker_file() -> String {
    ".sync-hash".to_string()
}

fn default_ignore_file() -> String {
    ".npmignore".to_string()
}

fn default_source_extensions() -> Vec<String> {
    ["js", "mjs", "cjs", "jsx", "ts", "tsx", "json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Install configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Package manager executable
    #[serde(default = "default_npm")]
    pub npm: String,

    /// Lock file created inside the dependency directory
    #[serde(default = "default_lock_file")]
    pub lock_file: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            npm: default_npm(),
            lock_file: default_lock_file(),
        }
    }
}

fn default_npm() -> String {
    "npm".to_string()
}

fn default_lock_file() -> String {
    ".sync.lock".to_string()
}

/// Watch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_removal_protection_ms")]
    pub removal_protection_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            removal_protection_ms: default_removal_protection_ms(),
        }
    }
}

fn default_removal_protection_ms() -> u64 {
    2000
}

/// Run options (what the CLI does around the engine)
///
/// Watch mode is chosen by the `watch` command, not by configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Run build/watch scripts of source packages
    #[serde(default = "default_true")]
    pub script: bool,

    /// Also run when NODE_ENV=production
    #[serde(default)]
    pub production: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            script: true,
            production: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub install: InstallConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub run: RunConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> SyncResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> SyncResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from the consumer's `synec.toml`, the user config, or defaults,
    /// then apply `SYNEC_*` environment overrides.
    pub fn discover(consumer_root: &Path) -> SyncResult<(Self, Vec<ConfigWarning>)> {
        loader::discover(consumer_root)
    }

    /// Apply environment variable overrides (SYNEC_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Check every field the way the setters would.
    pub fn validate(&self, file: &Path) -> SyncResult<()> {
        let check = |result: Result<(), String>| {
            result.map_err(|message| SyncError::Config {
                file: file.to_path_buf(),
                message,
            })
        };

        check(validate_file_name("package.manifest_file", &self.package.manifest_file))?;
        check(validate_file_name("package.dependency_dir", &self.package.dependency_dir))?;
        check(validate_file_name("package.marker_file", &self.package.marker_file))?;
        check(validate_file_name("package.ignore_file", &self.package.ignore_file))?;
        check(validate_file_name("install.lock_file", &self.install.lock_file))?;
        check(validate_program(&self.install.npm))?;
        check(validate_window(Duration::from_millis(
            self.watch.removal_protection_ms,
        )))?;
        if self.package.source_extensions.is_empty() {
            return check(Err(
                "package.source_extensions must not be empty".to_string()
            ));
        }
        Ok(())
    }

    pub fn removal_protection(&self) -> Duration {
        Duration::from_millis(self.watch.removal_protection_ms)
    }

    pub fn set_removal_protection(&mut self, window: Duration) -> SyncResult<()> {
        validate_window(window).map_err(setter_error)?;
        self.watch.removal_protection_ms = window.as_millis() as u64;
        Ok(())
    }

    pub fn set_manifest_file(&mut self, name: impl Into<String>) -> SyncResult<()> {
        let name = name.into();
        validate_file_name("package.manifest_file", &name).map_err(setter_error)?;
        self.package.manifest_file = name;
        Ok(())
    }

    pub fn set_dependency_dir(&mut self, name: impl Into<String>) -> SyncResult<()> {
        let name = name.into();
        validate_file_name("package.dependency_dir", &name).map_err(setter_error)?;
        self.package.dependency_dir = name;
        Ok(())
    }

    pub fn set_npm_program(&mut self, program: impl Into<String>) -> SyncResult<()> {
        let program = program.into();
        validate_program(&program).map_err(setter_error)?;
        self.install.npm = program;
        Ok(())
    }

    /// Replace the fingerprinted extensions. Leading dots are dropped.
    pub fn set_source_extensions<I, S>(&mut self, extensions: I) -> SyncResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(setter_error(
                "package.source_extensions must not be empty".to_string(),
            ));
        }
        self.package.source_extensions = extensions;
        Ok(())
    }

    pub fn set_script(&mut self, script: bool) {
        self.run.script = script;
    }

    pub fn set_production(&mut self, production: bool) {
        self.run.production = production;
    }
}

fn setter_error(message: String) -> SyncError {
    SyncError::Config {
        file: PathBuf::from("<setter>"),
        message,
    }
}

/// Names must be exactly one normal path component.
fn validate_file_name(key: &str, name: &str) -> Result<(), String> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(format!("{key} must be a plain file name, got '{name}'")),
    }
}

fn validate_program(program: &str) -> Result<(), String> {
    if program.trim().is_empty() {
        Err("install.npm must not be empty".to_string())
    } else {
        Ok(())
    }
}

fn validate_window(window: Duration) -> Result<(), String> {
    if window > MAX_REMOVAL_PROTECTION {
        Err(format!(
            "watch.removal_protection_ms must be at most {}",
            MAX_REMOVAL_PROTECTION.as_millis()
        ))
    } else {
        Ok(())
    }
}
