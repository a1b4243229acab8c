//! Optional TOML configuration file.
//!
//! ```toml
//! [table]
//! sampleSize = 50
//! tolerance = 2
//! toleranceStrategy = "backwards"
//!
//! [resolver]
//! preserveTab = false
//! ```
//!
//! Every key is optional and falls back to the library defaults.

use std::path::{Path, PathBuf};

use grapher_model::{ResolverOptions, TableOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrapherConfig {
    pub table: TableOptions,
    pub resolver: ResolverOptions,
}

impl GrapherConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text, path)?;
        debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }
}
