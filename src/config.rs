// YAML configuration

use crate::filter::ViewState;
use crate::storage::Backend;
use crate::todo::{TodoFilter, TodoSort};
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug};

/// Settings read from `config.yaml`; every field is optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where slots are stored
    pub backend: Backend,
    /// Initial filter for list views
    pub default_filter: TodoFilter,
    /// Initial sort for list views
    pub default_sort: TodoSort,
    /// Maximum tracing level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            default_filter: TodoFilter::default(),
            default_sort: TodoSort::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Otherwise the per-user config file is
    /// used when present, and defaults when not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/todostore/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("todostore").join("config.yaml"))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = ?path, ?config, "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content).context("Failed to parse YAML")?;
        config.level()?;
        Ok(config)
    }

    pub fn level(&self) -> Result<Level> {
        self.log_level
            .parse()
            .map_err(|_| eyre!("Invalid log_level: {} (expected error, warn, info, debug or trace)", self.log_level))
    }

    /// Initial view state for list commands
    pub fn view(&self) -> ViewState {
        ViewState::new(self.default_filter, "", self.default_sort)
    }
}
