//! Contracts: batch install, idempotence and change detection.

use std::sync::Arc;

use synec::{InstallOutcome, SyncError, SyncEvent};

use crate::common::*;

/// CONTRACT: a second install with no source change does nothing.
#[test]
fn contract_install_is_idempotent() {
    let consumer = TestConsumer::with_references(&["widgets", "gadgets"]);
    let paths = vec![consumer.add_package("widgets"), consumer.add_package("gadgets")];
    let installer = Arc::new(RecordingInstaller::new());
    let (engine, log) = consumer.engine(installer.clone());

    let first = engine.install_without_save(&paths).unwrap();
    let second = engine.install_without_save(&paths).unwrap();

    assert!(first.installed());
    assert_eq!(second, InstallOutcome::UpToDate { packages: paths });
    assert_eq!(installer.install_count(), 1);
    assert_eq!(log.count(|e| matches!(e, SyncEvent::InstallSkipped { .. })), 1);
}

/// CONTRACT: one changed package reinstalls the whole installable set in one call.
#[test]
fn contract_change_reinstalls_complete_batch() {
    let consumer = TestConsumer::with_references(&["widgets", "gadgets"]);
    let paths = vec![consumer.add_package("widgets"), consumer.add_package("gadgets")];
    let installer = Arc::new(RecordingInstaller::new());
    let (engine, _log) = consumer.engine(installer.clone());
    engine.install_without_save(&paths).unwrap();

    consumer.write("gadgets", "index.js", "module.exports = 'v2';");
    assert!(engine.needs_update(&paths[1]).unwrap());
    assert!(!engine.needs_update(&paths[0]).unwrap());

    engine.install_without_save(&paths).unwrap();

    assert_eq!(
        installer.batches(),
        vec![
            vec!["widgets".to_string(), "gadgets".to_string()],
            vec!["widgets".to_string(), "gadgets".to_string()],
        ]
    );
    assert_eq!(
        read(&consumer.installed_dir("gadgets").join("index.js")).as_deref(),
        Some("module.exports = 'v2';")
    );
}

/// CONTRACT: files outside the fingerprinted set never trigger a reinstall.
#[test]
fn contract_unfingerprinted_files_are_ignored() {
    let consumer = TestConsumer::with_references(&["widgets"]);
    let path = consumer.add_package("widgets");
    let installer = Arc::new(RecordingInstaller::new());
    let (engine, _log) = consumer.engine(installer.clone());
    engine.install_without_save(&[path.clone()]).unwrap();

    consumer.write("widgets", "README.md", "# docs");
    consumer.write("widgets", "test/index.test.js", "it('works')");
    consumer.write("widgets", "node_modules/dep/index.js", "dep");

    assert!(!engine.needs_update(&path).unwrap());
}

/// CONTRACT: deleting the marker makes the package stale again.
#[test]
fn contract_missing_marker_means_stale() {
    let consumer = TestConsumer::with_references(&["widgets"]);
    let path = consumer.add_package("widgets");
    let (engine, _log) = consumer.engine(Arc::new(RecordingInstaller::new()));
    engine.install_without_save(&[path.clone()]).unwrap();

    std::fs::remove_file(consumer.marker("widgets")).unwrap();

    assert!(engine.needs_update(&path).unwrap());
}

/// CONTRACT: a pack failure installs nothing and records no markers.
#[test]
fn contract_pack_failure_is_atomic() {
    let consumer = TestConsumer::with_references(&["widgets", "gadgets"]);
    let paths = vec![consumer.add_package("widgets"), consumer.add_package("gadgets")];
    let installer = Arc::new(RecordingInstaller::failing_pack("gadgets"));
    let (engine, log) = consumer.engine(installer.clone());

    let err = engine.install_without_save(&paths).unwrap_err();

    assert!(matches!(err, SyncError::PackFailed { .. }));
    assert_eq!(installer.install_count(), 0);
    assert!(!consumer.marker("widgets").exists());
    assert!(!consumer.marker("gadgets").exists());
    assert_eq!(log.count(|e| matches!(e, SyncEvent::InstallFailed { .. })), 1);
}

/// CONTRACT: an install failure records no markers, so the next run retries.
#[test]
fn contract_install_failure_is_atomic() {
    let consumer = TestConsumer::with_references(&["widgets"]);
    let path = consumer.add_package("widgets");
    std::fs::create_dir_all(consumer.installed_dir("widgets")).unwrap();
    let installer = Arc::new(RecordingInstaller::failing_install());
    let (engine, _log) = consumer.engine(installer.clone());

    let err = engine.install_without_save(&[path.clone()]).unwrap_err();

    assert!(matches!(err, SyncError::InstallFailed { .. }));
    assert!(err.to_string().contains("ERESOLVE"));
    assert!(!consumer.marker("widgets").exists());
    assert!(engine.needs_update(&path).unwrap());
}

/// CONTRACT: packages without a name or version are never packed.
#[test]
fn contract_invalid_packages_are_excluded() {
    let consumer = TestConsumer::with_references(&["widgets", "draft"]);
    let valid = consumer.add_package("widgets");
    let invalid = consumer.add_package_with_manifest("draft", r#"{ "name": "draft" }"#);
    let installer = Arc::new(RecordingInstaller::new());
    let (engine, log) = consumer.engine(installer.clone());

    let outcome = engine
        .install_without_save(&[valid.clone(), invalid.clone()])
        .unwrap();

    assert_eq!(
        log.count(|e| matches!(e, SyncEvent::PackageInvalid { path } if path.contains("draft"))),
        1
    );
    assert_eq!(log.count(|e| matches!(e, SyncEvent::PackageInvalid { .. })), 1);
    assert_eq!(outcome.packages(), &[valid]);
    assert_eq!(installer.batches(), vec![vec!["widgets".to_string()]]);
    assert!(!engine.is_installable(&invalid));
}

/// CONTRACT: recording a hash for a package that was never installed is harmless.
#[test]
fn contract_record_hash_without_installed_copy() {
    let consumer = TestConsumer::with_references(&["widgets"]);
    let path = consumer.add_package("widgets");
    let (engine, _log) = consumer.engine(Arc::new(RecordingInstaller::new()));

    engine.record_hash(&path).unwrap();

    assert!(!consumer.installed_dir("widgets").exists());
}

/// CONTRACT: the marker holds the content fingerprint of the source.
#[test]
fn contract_marker_holds_fingerprint() {
    let consumer = TestConsumer::with_references(&["widgets"]);
    let path = consumer.add_package("widgets");
    let (engine, _log) = consumer.engine(Arc::new(RecordingInstaller::new()));
    engine.install_without_save(&[path]).unwrap();

    let marker = read(&consumer.marker("widgets")).unwrap();

    assert!(marker.trim().starts_with("sha256:"));
    assert_eq!(marker.trim().len(), "sha256:".len() + 64);
}
