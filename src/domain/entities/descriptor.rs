//! Package descriptor entity
//!
//! The subset of a `package.json` the engine reads, for both the consumer
//! project and every referenced source package.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

/// Parsed package manifest. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PackageDescriptor {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Entry point
    pub main: Option<String>,
    /// Declared publish file list
    pub files: Option<Vec<String>>,
    pub scripts: BTreeMap<String, String>,
    /// Raw local reference declaration (consumer only)
    #[serde(rename = "localReferences", alias = "localDependencies")]
    pub local_references: Option<Value>,
}

impl PackageDescriptor {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Name, if set and non-empty
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// Packages need both a name and a version to be packed and installed.
    pub fn is_installable(&self) -> bool {
        self.name().is_some() && self.version.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    /// Declared file list, when present and non-empty
    pub fn declared_files(&self) -> Option<&[String]> {
        self.files.as_deref().filter(|files| !files.is_empty())
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts
            .get(name)
            .map(String::as_str)
            .filter(|cmd| !cmd.trim().is_empty())
    }

    /// Ordered local references, or `None` when the engine has nothing to do.
    ///
    /// Accepts a mapping of name to path (in declaration order) or a plain
    /// sequence of paths. Non-string entries are skipped.
    pub fn local_references(&self) -> Option<Vec<PathBuf>> {
        let values: Vec<&Value> = match self.local_references.as_ref()? {
            Value::Object(map) => map.values().collect(),
            Value::Array(items) => items.iter().collect(),
            _ => return None,
        };

        let paths: Vec<PathBuf> = values
            .into_iter()
            .filter_map(|value| match value.as_str() {
                Some(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
                _ => {
                    tracing::warn!(entry = %value, "ignoring local reference that is not a path");
                    None
                }
            })
            .collect();

        if paths.is_empty() {
            None
        } else {
            Some(paths)
        }
    }
}
