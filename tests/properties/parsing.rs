//! Property tests for config and manifest parsing.

use std::path::Path;

use proptest::prelude::*;

use tower_operator::config::parse_with_warnings;
use tower_operator::infrastructure::repositories::parse_manifest;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: config parsing never panics on arbitrary input.
    #[test]
    fn property_config_parse_never_panics(content in "(?s).{0,256}") {
        let _ = parse_with_warnings(&content, Path::new("fuzz.toml"));
    }

    /// PROPERTY: manifest parsing never panics on arbitrary input.
    #[test]
    fn property_manifest_parse_never_panics(content in "(?s).{0,256}") {
        let _ = parse_manifest(&content);
    }

    /// PROPERTY: any integer disc count survives a manifest parse.
    #[test]
    fn property_manifest_keeps_disc_count(discs in any::<i64>()) {
        let content = format!(
            "apiVersion: tower-operator.dev/v1\nkind: TowerChallenge\nmetadata:\n  name: demo\nspec:\n  discs: {discs}\n"
        );
        let doc = parse_manifest(&content).unwrap();
        prop_assert_eq!(doc.spec.discs, discs);
    }
}
