//! Configuration loading
//!
//! Sources, highest first: CLI flags (applied by the caller), `TOWER_*`
//! environment variables, `./tower-operator.toml`, the user config, defaults.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OperatorError, OperatorResult};

use super::types::{Config, Verbosity};

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "tower-operator.toml";

/// Every key the config understands, grouped by table
const SCHEMA: &[(&str, &[&str])] = &[
    ("paths", &["manifests", "records"]),
    ("retry", &["max_attempts", "backoff", "base_delay_ms"]),
    ("validation", &["max_discs"]),
    (
        "controller",
        &["resync_secs", "requeue_base_ms", "requeue_max_ms", "debounce_ms"],
    ),
    ("output", &["verbosity"]),
];

/// Largest edit distance still offered as a suggestion
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> OperatorResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    parse_with_warnings(&content, path)
}

/// Parse TOML content; `path` is only used for diagnostics
pub fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> OperatorResult<(Config, Vec<ConfigWarning>)> {
    let mut ignored: Vec<Vec<String>> = Vec::new();
    let config: Config = serde_ignored::deserialize(
        toml::de::Deserializer::new(content),
        |p| ignored.push(p.to_string().split('.').map(str::to_string).collect()),
    )
    .map_err(|e| OperatorError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = ignored
        .iter()
        .filter_map(|segments| {
            let (key, parents) = segments.split_last()?;
            let table = parents.first().map(String::as_str);
            Some(ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: key_line(content, table, key),
                suggestion: suggest_key(table, key),
            })
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults
///
/// A config file that fails to parse is skipped in favour of the next source.
pub fn load_or_default(project_root: Option<&Path>) -> Config {
    let candidates = [
        project_root.map(|root| root.join(PROJECT_CONFIG_FILE)),
        user_config_path(),
    ];

    let config = candidates
        .into_iter()
        .flatten()
        .filter(|path| path.exists())
        .find_map(|path| Config::load(&path).ok())
        .unwrap_or_default();

    with_env_overrides(config)
}

/// `$XDG_CONFIG_HOME/tower-operator/config.toml` or the platform equivalent
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tower-operator").join("config.toml"))
}

/// Apply environment variable overrides (TOWER_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`
///
/// Empty paths and unparsable numbers are ignored; an unknown verbosity
/// falls back to normal.
pub fn with_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
    let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u32>().ok());

    if let Some(dir) = path("TOWER_MANIFESTS") {
        config.paths.manifests = dir;
    }
    if let Some(dir) = path("TOWER_RECORDS") {
        config.paths.records = dir;
    }
    if let Some(n) = number("TOWER_MAX_ATTEMPTS") {
        config.retry.max_attempts = n;
    }
    if let Some(n) = number("TOWER_MAX_DISCS") {
        config.validation.max_discs = n;
    }
    if let Some(level) = lookup("TOWER_VERBOSITY") {
        config.output.verbosity = parse_verbosity(&level);
    }

    config
}

fn parse_verbosity(level: &str) -> Verbosity {
    match level.trim().to_ascii_lowercase().as_str() {
        "quiet" => Verbosity::Quiet,
        "verbose" => Verbosity::Verbose,
        "debug" => Verbosity::Debug,
        _ => Verbosity::Normal,
    }
}

/// 1-based line of `key = ...` inside `[table]` (or before any table header)
fn key_line(content: &str, table: Option<&str>, key: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    for (i, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = Some(header.trim());
            if current == Some(key) {
                // Unknown table: point at its header
                return Some(i + 1);
            }
            continue;
        }
        let assigns_key = line
            .split_once('=')
            .is_some_and(|(lhs, _)| lhs.trim() == key);
        if assigns_key && (table.is_none() || current == table) {
            return Some(i + 1);
        }
    }
    None
}

/// Closest known key; inside a known table only that table's keys compete,
/// at the top level only table names do
fn suggest_key(table: Option<&str>, unknown: &str) -> Option<String> {
    let candidates: Vec<&str> = match table {
        Some(table) => SCHEMA
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, keys)| keys.to_vec())
            .unwrap_or_default(),
        None => SCHEMA.iter().map(|(name, _)| *name).collect(),
    };

    candidates
        .into_iter()
        .map(|candidate| (edit_distance(unknown, candidate), candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string())
}

/// Levenshtein distance over chars, single row
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}
