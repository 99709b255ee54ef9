//! Property tests for entry-point normalization.

use proptest::prelude::*;

use synec::domain::value_objects::normalize_entry_point;

fn relative_path() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[A-Za-z0-9_-][A-Za-z0-9._-]{0,11}")
        .unwrap()
        .prop_filter("not a dot segment", |s| s != "." && s != "..");
    proptest::collection::vec(segment, 1..=4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: normalization never panics on arbitrary input.
    #[test]
    fn property_normalize_never_panics(s in "(?s).{0,128}") {
        let _ = normalize_entry_point(&s);
    }

    /// PROPERTY: a leading `./` does not change the result.
    #[test]
    fn property_leading_current_dir_is_dropped(path in relative_path()) {
        prop_assert_eq!(
            normalize_entry_point(&format!("./{path}")),
            Some(path.clone())
        );
    }

    /// PROPERTY: normalization is idempotent.
    #[test]
    fn property_normalize_is_idempotent(path in relative_path()) {
        let once = normalize_entry_point(&path).unwrap();
        prop_assert_eq!(normalize_entry_point(&once), Some(once.clone()));
    }

    /// PROPERTY: paths climbing above the package root are rejected.
    #[test]
    fn property_escaping_paths_are_rejected(path in relative_path()) {
        prop_assert_eq!(normalize_entry_point(&format!("../{path}")), None);
    }
}
