//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::services::{Backoff, RetryPolicy};
use crate::domain::value_objects::DiscCount;
use crate::error::OperatorResult;

use super::loader::{self, ConfigWarning};

/// Where manifests and records live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_manifests")]
    pub manifests: PathBuf,

    #[serde(default = "default_records")]
    pub records: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifests: default_manifests(),
            records: default_records(),
        }
    }
}

fn default_manifests() -> PathBuf {
    PathBuf::from("manifests")
}

fn default_records() -> PathBuf {
    PathBuf::from(".tower/records")
}

/// Per-operation retry bound of the apply engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default)]
    pub backoff: Backoff,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff: Backoff::default(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            self.backoff,
            Duration::from_millis(self.base_delay_ms),
        )
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    20
}

/// Spec validation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_discs")]
    pub max_discs: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_discs: default_max_discs(),
        }
    }
}

fn default_max_discs() -> u32 {
    DiscCount::DEFAULT_MAX
}

/// Reference controller timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_resync_secs")]
    pub resync_secs: u64,

    #[serde(default = "default_requeue_base_ms")]
    pub requeue_base_ms: u64,

    #[serde(default = "default_requeue_max_ms")]
    pub requeue_max_ms: u64,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            resync_secs: default_resync_secs(),
            requeue_base_ms: default_requeue_base_ms(),
            requeue_max_ms: default_requeue_max_ms(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl ControllerConfig {
    pub fn resync(&self) -> Duration {
        Duration::from_secs(self.resync_secs)
    }

    pub fn requeue_base(&self) -> Duration {
        Duration::from_millis(self.requeue_base_ms)
    }

    pub fn requeue_max(&self) -> Duration {
        Duration::from_millis(self.requeue_max_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_resync_secs() -> u64 {
    300
}

fn default_requeue_base_ms() -> u64 {
    500
}

fn default_requeue_max_ms() -> u64 {
    60_000
}

fn default_debounce_ms() -> u64 {
    200
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> OperatorResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> OperatorResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults
    pub fn load_or_default(project_root: Option<&Path>) -> Self {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (TOWER_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }
}
