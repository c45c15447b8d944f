//! CLI configuration with TOML file support.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rewind_store_lmdb::DEFAULT_MAP_SIZE;
use rewind_utils::LogFormat;

/// Name of the config file looked up under the home directory when
/// `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config/rewind.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where the node's stores and validator files live.
///
/// Relative paths are resolved against the home directory by
/// [`RewindConfig::resolve`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewindConfig {
    /// Directory holding the `state` and `blockstore` environments.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Validator key file (JSON).
    #[serde(default = "default_key_file")]
    pub priv_validator_key_file: PathBuf,

    /// Validator last-sign-state file (JSON).
    #[serde(default = "default_state_file")]
    pub priv_validator_state_file: PathBuf,

    /// LMDB map size in bytes for both environments.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_key_file() -> PathBuf {
    PathBuf::from("config/priv_validator_key.json")
}

fn default_state_file() -> PathBuf {
    PathBuf::from("data/priv_validator_state.json")
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_log_level() -> String {
    "info".into()
}

/// Absolute locations derived from a config and a home directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodePaths {
    pub state_dir: PathBuf,
    pub block_dir: PathBuf,
    pub key_file: PathBuf,
    pub state_file: PathBuf,
}

impl RewindConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load `explicit` if given, else `<home>/config/rewind.toml` if it
    /// exists, else defaults.
    pub fn load(home: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_toml_file(path),
            None => {
                let implicit = home.join(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_toml_file(&implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn resolve(&self, home: &Path) -> NodePaths {
        let data_dir = rooted(home, &self.data_dir);
        NodePaths {
            state_dir: data_dir.join("state"),
            block_dir: data_dir.join("blockstore"),
            key_file: rooted(home, &self.priv_validator_key_file),
            state_file: rooted(home, &self.priv_validator_state_file),
        }
    }
}

impl Default for RewindConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            priv_validator_key_file: default_key_file(),
            priv_validator_state_file: default_state_file(),
            map_size: default_map_size(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

fn rooted(home: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        home.join(path)
    }
}
