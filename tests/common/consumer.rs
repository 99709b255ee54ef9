//! Consumer project fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use synec::{Config, Engine, PackageInstaller, SyncEvent, SyncEventSink};

/// Consumer at `<tmp>/app`, source packages at `<tmp>/<name>`.
pub struct TestConsumer {
    dir: TempDir,
}

impl TestConsumer {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        let consumer = Self { dir };
        consumer.write_consumer_manifest(r#"{ "name": "app", "version": "0.0.0" }"#);
        consumer
    }

    /// Consumer declaring `names` as local references, in that order.
    pub fn with_references(names: &[&str]) -> Self {
        let consumer = Self::new();
        consumer.declare_references(names);
        consumer
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("app")
    }

    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Path of a package as the consumer references it.
    pub fn reference(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("../{name}"))
    }

    pub fn references(&self, names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|name| self.reference(name)).collect()
    }

    pub fn installed_dir(&self, name: &str) -> PathBuf {
        self.root().join("node_modules").join(name)
    }

    pub fn marker(&self, name: &str) -> PathBuf {
        self.installed_dir(name).join(".sync-hash")
    }

    pub fn write_consumer_manifest(&self, content: &str) {
        fs::write(self.root().join("package.json"), content).unwrap();
    }

    pub fn declare_references(&self, names: &[&str]) {
        let entries: Vec<String> = names
            .iter()
            .map(|name| format!(r#""{name}": "../{name}""#))
            .collect();
        self.write_consumer_manifest(&format!(
            r#"{{ "name": "app", "version": "0.0.0", "localReferences": {{ {} }} }}"#,
            entries.join(", ")
        ));
    }

    /// Installable package with an `index.js` entry point.
    pub fn add_package(&self, name: &str) -> PathBuf {
        self.add_package_with_manifest(
            name,
            &format!(r#"{{ "name": "{name}", "version": "1.0.0", "main": "index.js" }}"#),
        );
        self.write(name, "index.js", &format!("module.exports = '{name}';"));
        self.reference(name)
    }

    pub fn add_package_with_manifest(&self, name: &str, manifest: &str) -> PathBuf {
        self.write(name, "package.json", manifest);
        self.reference(name)
    }

    pub fn write(&self, package: &str, rel: &str, content: &str) -> PathBuf {
        let path = self.package_dir(package).join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    pub fn remove(&self, package: &str, rel: &str) {
        fs::remove_file(self.package_dir(package).join(rel)).unwrap();
    }

    pub fn engine(&self, installer: Arc<dyn PackageInstaller>) -> (Engine, EventLog) {
        self.engine_with_config(Config::default(), installer)
    }

    pub fn engine_with_config(
        &self,
        config: Config,
        installer: Arc<dyn PackageInstaller>,
    ) -> (Engine, EventLog) {
        let log = EventLog::default();
        let engine = Engine::new(self.root(), config, installer, Arc::new(log.clone()));
        (engine, log)
    }
}

/// Event sink keeping every event for later assertions.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SyncEvent>>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&SyncEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }
}

impl SyncEventSink for EventLog {
    fn on_event(&self, event: SyncEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Read a file to a string, `None` when it does not exist.
pub fn read(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}
