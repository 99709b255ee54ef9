//! Contracts: live synchronization with a real filesystem watcher.

use std::sync::Arc;
use std::time::Duration;

use synec::{Config, SyncEvent};

use crate::common::*;

const TIMEOUT: Duration = Duration::from_secs(10);

fn installed_consumer() -> (TestConsumer, Config) {
    let consumer = TestConsumer::with_references(&["widgets"]);
    consumer.add_package("widgets");
    let mut config = Config::default();
    config
        .set_removal_protection(Duration::from_secs(30))
        .unwrap();
    (consumer, config)
}

/// CONTRACT: additions and removals in the source reach the installed copy.
#[test]
fn contract_round_trip_copy_and_remove() {
    let (consumer, config) = installed_consumer();
    let (engine, log) =
        consumer.engine_with_config(config, Arc::new(RecordingInstaller::new()));
    let paths = engine.local_references().unwrap();
    engine.install_without_save(&paths).unwrap();

    let session = engine.watch_references(&paths).unwrap();
    assert_eq!(session.packages(), &["widgets".to_string()]);

    consumer.write("widgets", "lib/extra.js", "module.exports = 42;");
    let mirrored = consumer.installed_dir("widgets").join("lib/extra.js");
    assert!(wait_for(TIMEOUT, || read(&mirrored).as_deref() == Some("module.exports = 42;")));

    consumer.remove("widgets", "lib/extra.js");
    assert!(wait_for(TIMEOUT, || !mirrored.exists()));

    session.stop();
    assert_eq!(log.count(|e| matches!(e, SyncEvent::Shutdown)), 1);
    assert!(log.count(|e| matches!(e, SyncEvent::FileRemoved { .. })) >= 1);
}

/// CONTRACT: removals are held back while protection is active.
#[test]
fn contract_removal_protection_suppresses_removals() {
    let (consumer, config) = installed_consumer();
    let (engine, log) =
        consumer.engine_with_config(config, Arc::new(RecordingInstaller::new()));
    let paths = engine.local_references().unwrap();
    engine.install_without_save(&paths).unwrap();
    let session = engine.watch_references(&paths).unwrap();

    engine.removal_protection().arm();
    consumer.remove("widgets", "index.js");

    assert!(wait_for(TIMEOUT, || {
        log.count(|e| matches!(e, SyncEvent::RemovalSuppressed { .. })) > 0
    }));
    assert!(consumer.installed_dir("widgets").join("index.js").exists());

    session.stop();
}

/// CONTRACT: excluded files are never mirrored.
#[test]
fn contract_excluded_files_stay_out() {
    let (consumer, config) = installed_consumer();
    consumer.write("widgets", ".npmignore", "scratch/\n");
    let (engine, _log) =
        consumer.engine_with_config(config, Arc::new(RecordingInstaller::new()));
    let paths = engine.local_references().unwrap();
    engine.install_without_save(&paths).unwrap();
    let session = engine.watch_references(&paths).unwrap();

    consumer.write("widgets", "scratch/notes.js", "// wip");
    consumer.write("widgets", "lib/kept.js", "// kept");

    let kept = consumer.installed_dir("widgets").join("lib/kept.js");
    assert!(wait_for(TIMEOUT, || kept.exists()));
    assert!(!consumer.installed_dir("widgets").join("scratch/notes.js").exists());

    session.stop();
}

/// CONTRACT: after stop, changes are no longer mirrored.
#[test]
fn contract_stop_releases_watchers() {
    let (consumer, config) = installed_consumer();
    let (engine, _log) =
        consumer.engine_with_config(config, Arc::new(RecordingInstaller::new()));
    let paths = engine.local_references().unwrap();
    engine.install_without_save(&paths).unwrap();

    let session = engine.watch_references(&paths).unwrap();
    session.stop();
    assert!(!session.is_running());

    consumer.write("widgets", "late.js", "// late");
    std::thread::sleep(Duration::from_millis(300));

    assert!(!consumer.installed_dir("widgets").join("late.js").exists());
}

/// CONTRACT: once the protection window elapses, removals propagate again.
#[test]
fn contract_removals_resume_after_protection_window() {
    let consumer = TestConsumer::with_references(&["widgets"]);
    consumer.add_package("widgets");
    consumer.write("widgets", "lib/other.js", "module.exports = 'other';");
    let mut config = Config::default();
    config
        .set_removal_protection(Duration::from_millis(1000))
        .unwrap();
    let (engine, log) =
        consumer.engine_with_config(config, Arc::new(RecordingInstaller::new()));
    let paths = engine.local_references().unwrap();
    engine.install_without_save(&paths).unwrap();
    let session = engine.watch_references(&paths).unwrap();

    engine.removal_protection().arm();
    consumer.remove("widgets", "index.js");
    assert!(wait_for(TIMEOUT, || {
        log.count(|e| matches!(e, SyncEvent::RemovalSuppressed { path, .. } if path == "index.js")) > 0
    }));
    assert!(consumer.installed_dir("widgets").join("index.js").exists());

    assert!(wait_for(TIMEOUT, || !engine.removal_protection().is_active()));
    consumer.remove("widgets", "lib/other.js");

    let other = consumer.installed_dir("widgets").join("lib/other.js");
    assert!(wait_for(TIMEOUT, || !other.exists()));
    assert_eq!(
        log.count(|e| matches!(e, SyncEvent::RemovalSuppressed { path, .. } if path == "lib/other.js")),
        0
    );
    assert!(log
        .events()
        .iter()
        .any(|e| matches!(e, SyncEvent::FileRemoved { path, .. } if path == "lib/other.js")));

    session.stop();
}
