//! Configuration file support for Yard.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/yard/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub workout: WorkoutConfig,

    #[serde(default)]
    pub rec_yard: RecYardConfig,
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

/// Default workout parameters, overridable per run from the CLI
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutConfig {
    #[serde(default = "default_rule_set")]
    pub rule_set: String,

    #[serde(default = "default_flip_mode")]
    pub flip_mode: String,

    #[serde(default = "default_exercise")]
    pub exercise: String,

    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u32,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            rule_set: default_rule_set(),
            flip_mode: default_flip_mode(),
            exercise: default_exercise(),
            countdown_seconds: default_countdown_seconds(),
        }
    }
}

/// Rec Yard remote service configuration
///
/// Official runs need all three fields; casual workouts never touch the
/// network.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct RecYardConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub user_id: Option<Uuid>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("yard")
}

fn default_rule_set() -> String {
    "standard".into()
}

fn default_flip_mode() -> String {
    "fresh_fish".into()
}

fn default_exercise() -> String {
    "suit_split".into()
}

fn default_countdown_seconds() -> u32 {
    3
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
        base.join("yard").join("config.toml")
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
