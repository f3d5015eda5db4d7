//! Configuration file support for mnemo.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/mnemo/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub study: StudyConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Study session sizing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Ceiling on due cards pulled into one session
    #[serde(default = "default_max_due_per_session")]
    pub max_due_per_session: usize,

    /// Ceiling on never-reviewed cards introduced per session
    #[serde(default = "default_new_per_session")]
    pub new_per_session: usize,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            max_due_per_session: default_max_due_per_session(),
            new_per_session: default_new_per_session(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("mnemo")
}

fn default_max_due_per_session() -> usize {
    20
}

fn default_new_per_session() -> usize {
    10
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("mnemo").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
