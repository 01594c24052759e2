use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use tower_operator::config::{Config, Verbosity, PROJECT_CONFIG_FILE};
use tower_operator::domain::ports::ReconcileEventSink;
use tower_operator::domain::value_objects::ParentIdentity;
use tower_operator::infrastructure::{
    ConsoleEventSink, FsRecordStore, JsonEventSink, ManifestRepository,
};

use crate::cli::Cli;

/// Resolved configuration shared by every subcommand
pub struct CommandContext {
    pub config: Config,
    pub json: bool,
}

impl CommandContext {
    /// Load config (explicit file, project, user, defaults), then apply
    /// env overrides and CLI flags
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                let (config, warnings) = Config::load_with_warnings(path)
                    .with_context(|| format!("loading config {}", path.display()))?;
                for warning in warnings {
                    eprintln!("warning: {}", warning);
                }
                config.with_env_overrides()
            }
            None => {
                let cwd = std::env::current_dir().context("reading working directory")?;
                let project_config = cwd.join(PROJECT_CONFIG_FILE);
                if project_config.exists() {
                    let (_, warnings) = Config::load_with_warnings(&project_config)?;
                    for warning in warnings {
                        eprintln!("warning: {}", warning);
                    }
                }
                Config::load_or_default(Some(&cwd))
            }
        };

        if let Some(dir) = &cli.manifests {
            config.paths.manifests = dir.clone();
        }
        if let Some(dir) = &cli.records {
            config.paths.records = dir.clone();
        }
        match cli.verbose {
            0 => {}
            1 => config.output.verbosity = Verbosity::Verbose,
            _ => config.output.verbosity = Verbosity::Debug,
        }

        Ok(Self {
            config,
            json: cli.json,
        })
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.config.paths.manifests.clone()
    }

    pub fn repository(&self) -> ManifestRepository {
        ManifestRepository::new(self.manifests_dir())
    }

    pub fn store(&self) -> FsRecordStore {
        FsRecordStore::new(self.config.paths.records.clone())
    }

    pub fn event_sink(&self) -> Arc<dyn ReconcileEventSink> {
        if self.json {
            Arc::new(JsonEventSink::stdout())
        } else {
            Arc::new(ConsoleEventSink::stderr(self.config.output.verbosity))
        }
    }
}

pub fn parse_identity(name: &str) -> Result<ParentIdentity> {
    name.parse()
        .with_context(|| format!("invalid challenge name '{}'", name))
}
