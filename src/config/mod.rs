//! Configuration module
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (TOWER_*)
//! 3. Project config (./tower-operator.toml)
//! 4. User config (~/.config/tower-operator/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use loader::{
    parse_with_warnings, user_config_path, with_overrides_from, ConfigWarning,
    PROJECT_CONFIG_FILE,
};
pub use types::{
    Config, ControllerConfig, OutputConfig, PathsConfig, RetryConfig, ValidationConfig, Verbosity,
};
