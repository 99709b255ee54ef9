//! Contracts: watch-set precedence.

use std::sync::Arc;

use crate::common::*;

/// CONTRACT: a declared file list wins over the legacy ignore file.
#[test]
fn contract_declared_files_take_precedence() {
    let consumer = TestConsumer::new();
    let path = consumer.add_package_with_manifest(
        "widgets",
        r#"{ "name": "widgets", "version": "1.0.0", "main": "./dist/index.js", "files": ["dist", "types"] }"#,
    );
    consumer.write("widgets", ".npmignore", "src/\n");
    let (engine, _log) = consumer.engine(Arc::new(RecordingInstaller::new()));

    let rules = engine.resolve_watch_set(&path);

    assert_eq!(rules.name, "widgets");
    assert_eq!(rules.include, vec!["package.json", "dist/index.js", "dist", "types"]);
    assert_eq!(rules.exclude, vec!["node_modules", ".*/", ".*"]);
}

/// CONTRACT: without a file list, legacy patterns become excludes over everything.
#[test]
fn contract_legacy_ignore_becomes_excludes() {
    let consumer = TestConsumer::new();
    let path = consumer.add_package("widgets");
    consumer.write("widgets", ".npmignore", "# comment\n\nsrc/\n*.map\n");
    let (engine, _log) = consumer.engine(Arc::new(RecordingInstaller::new()));

    let rules = engine.resolve_watch_set(&path);

    assert_eq!(rules.include, vec!["."]);
    assert_eq!(rules.exclude, vec!["src/", "*.map", "node_modules", ".*/", ".*"]);
}

/// CONTRACT: with neither, everything is watched except the baseline.
#[test]
fn contract_fallback_watches_everything() {
    let consumer = TestConsumer::new();
    let path = consumer.add_package("widgets");
    let (engine, _log) = consumer.engine(Arc::new(RecordingInstaller::new()));

    let rules = engine.resolve_watch_set(&path);

    assert!(rules.includes_everything());
    assert_eq!(rules.exclude, vec!["node_modules", ".*/", ".*"]);
}

/// CONTRACT: edits to the ignore file are seen by the next resolution.
#[test]
fn contract_watch_set_is_not_cached() {
    let consumer = TestConsumer::new();
    let path = consumer.add_package("widgets");
    let (engine, _log) = consumer.engine(Arc::new(RecordingInstaller::new()));
    assert!(engine.resolve_watch_set(&path).exclude.len() == 3);

    consumer.write("widgets", ".npmignore", "coverage/\n");

    assert_eq!(engine.resolve_watch_set(&path).exclude[0], "coverage/");
}
