//! Optimizer configuration loaded from TOML.
//!
//! Every field has a default, so an empty file yields the standard
//! 2/5/5/3 squad, a budget of 100, three players per team and the
//! automatically chosen backend.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{SolverConfig, SquadRules};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub rules: SquadRules,
    pub solver: SolverConfig,
}

impl OptimizerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}
