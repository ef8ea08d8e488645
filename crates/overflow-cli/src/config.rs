//! Layered settings: command-line flags, then the TOML config file, then
//! built-in defaults.

use overflow_core::{SeedTag, default_seed_tags};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

pub const DEFAULT_CONFIG_PATH: &str = ".overflow/config.toml";
pub const DEFAULT_STORE_PATH: &str = ".overflow/forum.jsonl";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Contents of a config file. Every key is optional.
///
/// ```toml
/// store = "data/forum.jsonl"
/// log_level = "info"
///
/// [[seed_tags]]
/// name = "chatgpt"
/// description = "Questions related to ChatGPT prompts and usage"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub store: Option<String>,
    pub log_level: Option<String>,
    pub seed_tags: Option<Vec<SeedTag>>,
}

impl FileConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config {path}: {message}")]
    Parse { path: String, message: String },
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub store: PathBuf,
    pub log_level: String,
    pub seed_tags: Vec<SeedTag>,
    pub acting_as: Option<String>,
    /// The config file that was read, if any.
    pub config_path: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings from flags and the config file.
    ///
    /// An explicit `--config` must exist; the default path is only read
    /// when present.
    pub fn resolve(global: &GlobalArgs) -> Result<Self, ConfigError> {
        let (file, config_path) = match &global.config {
            Some(path) => {
                let path = PathBuf::from(path);
                (FileConfig::load(&path)?, Some(path))
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.is_file() {
                    (FileConfig::load(&path)?, Some(path))
                } else {
                    (FileConfig::default(), None)
                }
            }
        };
        Ok(Self::layer(global, file, config_path))
    }

    fn layer(global: &GlobalArgs, file: FileConfig, config_path: Option<PathBuf>) -> Self {
        let store = global
            .store
            .clone()
            .or(file.store)
            .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string());
        let log_level = global
            .log_level
            .clone()
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        Self {
            store: PathBuf::from(store),
            log_level,
            seed_tags: file.seed_tags.unwrap_or_else(default_seed_tags),
            acting_as: global
                .acting_as
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            config_path,
        }
    }
}
