//! Tests for the config module

use super::loader::{parse_with_warnings, with_overrides_from};
use super::types::*;
use crate::domain::services::Backoff;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.paths.manifests, PathBuf::from("manifests"));
    assert_eq!(config.paths.records, PathBuf::from(".tower/records"));
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.backoff, Backoff::Exponential);
    assert_eq!(config.validation.max_discs, 16);
    assert_eq!(config.controller.resync(), Duration::from_secs(300));
    assert_eq!(config.output.verbosity, Verbosity::Normal);
}

#[test]
fn test_config_parse_toml() {
    let toml = r#"
[paths]
manifests = "ops/challenges"

[retry]
max_attempts = 5
backoff = "linear"
base_delay_ms = 1

[validation]
max_discs = 10

[controller]
debounce_ms = 50

[output]
verbosity = "verbose"
"#;

    let config: Config = toml::from_str(toml).unwrap();

    assert_eq!(config.paths.manifests, PathBuf::from("ops/challenges"));
    assert_eq!(config.paths.records, PathBuf::from(".tower/records"));
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.backoff, Backoff::Linear);
    assert_eq!(config.validation.max_discs, 10);
    assert_eq!(config.controller.debounce(), Duration::from_millis(50));
    assert_eq!(config.controller.requeue_max_ms, 60_000);
    assert_eq!(config.output.verbosity, Verbosity::Verbose);
}

#[test]
fn test_retry_config_builds_policy() {
    let retry = RetryConfig {
        max_attempts: 4,
        backoff: Backoff::Fixed,
        base_delay_ms: 10,
    };
    let policy = retry.policy();

    assert_eq!(policy.max_attempts, 4);
    assert_eq!(policy.delay_after(3), Duration::from_millis(10));
}

#[test]
fn test_unknown_keys_become_warnings_with_suggestion() {
    let toml = "[retry]\nmax_atempts = 5\n";
    let (config, warnings) = parse_with_warnings(toml, Path::new("tower-operator.toml")).unwrap();

    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "max_atempts");
    assert_eq!(warnings[0].line, Some(2));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("max_attempts"));
    insta::assert_snapshot!(
        warnings[0].to_string(),
        @"unknown config key 'max_atempts' in tower-operator.toml:2 (did you mean 'max_attempts'?)"
    );
}

#[test]
fn test_unrelated_unknown_key_has_no_suggestion() {
    let toml = "[output]\ncolour_scheme = \"dark\"\n";
    let (_, warnings) = parse_with_warnings(toml, Path::new("c.toml")).unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion, None);
}

#[test]
fn test_invalid_toml_is_error() {
    let result = parse_with_warnings("[retry]\nmax_attempts = \"many\"\n", Path::new("c.toml"));
    assert!(result.is_err());
}

#[test]
fn test_load_with_warnings_reads_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tower-operator.toml");
    fs::write(&path, "[validation]\nmax_discs = 4\n").unwrap();

    let (config, warnings) = Config::load_with_warnings(&path).unwrap();
    assert_eq!(config.validation.max_discs, 4);
    assert!(warnings.is_empty());
}

#[test]
fn test_load_missing_file_is_error() {
    let dir = tempdir().unwrap();
    assert!(Config::load(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_env_overrides() {
    let config = with_overrides_from(
        Config::default(),
        env(&[
            ("TOWER_MANIFESTS", "/srv/manifests"),
            ("TOWER_RECORDS", "/srv/records"),
            ("TOWER_MAX_ATTEMPTS", "7"),
            ("TOWER_MAX_DISCS", "5"),
            ("TOWER_VERBOSITY", "debug"),
        ]),
    );

    assert_eq!(config.paths.manifests, PathBuf::from("/srv/manifests"));
    assert_eq!(config.paths.records, PathBuf::from("/srv/records"));
    assert_eq!(config.retry.max_attempts, 7);
    assert_eq!(config.validation.max_discs, 5);
    assert_eq!(config.output.verbosity, Verbosity::Debug);
}

#[test]
fn test_env_overrides_ignore_garbage_numbers() {
    let config = with_overrides_from(
        Config::default(),
        env(&[("TOWER_MAX_ATTEMPTS", "lots"), ("TOWER_MANIFESTS", "")]),
    );

    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.paths.manifests, PathBuf::from("manifests"));
}

#[test]
fn test_verbosity_serde() {
    let v: Verbosity = serde_yaml_ng::from_str("quiet").unwrap();
    assert_eq!(v, Verbosity::Quiet);
    let v: Verbosity = serde_yaml_ng::from_str("debug").unwrap();
    assert_eq!(v, Verbosity::Debug);
}
