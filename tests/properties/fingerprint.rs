//! Property tests for content fingerprints.

use std::collections::BTreeMap;
use std::fs;

use proptest::prelude::*;

use synec::domain::value_objects::ContentHasher;
use synec::infrastructure::FingerprintStore;
use synec::Config;

fn file_tree() -> impl Strategy<Value = BTreeMap<String, String>> {
    let segment = proptest::string::string_regex("[a-z][a-z0-9_]{0,7}").unwrap();
    let name = (proptest::collection::vec(segment, 1..=3), prop_oneof!["js", "ts", "json"])
        .prop_map(|(segments, ext)| format!("{}.{ext}", segments.join("/")));
    proptest::collection::btree_map(name, "[ -~]{0,64}", 1..8)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the same tree always hashes the same, whatever the write order.
    #[test]
    fn property_fingerprint_is_deterministic(tree in file_tree()) {
        let store = FingerprintStore::new(&Config::default());
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();

        for (rel, content) in &tree {
            let path = a.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        for (rel, content) in tree.iter().rev() {
            let path = b.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        prop_assert_eq!(store.compute(a.path()).unwrap(), store.compute(b.path()).unwrap());
    }

    /// PROPERTY: moving bytes from content into the path changes the digest.
    #[test]
    fn property_hasher_separates_path_and_content(
        path in "[a-z]{1,8}",
        content in "[a-z]{1,8}",
    ) {
        let mut split = ContentHasher::new();
        split.add_entry(&path, content.as_bytes());

        let mut shifted = ContentHasher::new();
        shifted.add_entry(&format!("{path}{}", &content[..1]), content[1..].as_bytes());

        prop_assert_ne!(split.finish(), shifted.finish());
    }
}
