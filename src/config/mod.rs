//! # Configuration
//!
//! TOML configuration for the `mudcore` binary and the tunables the command
//! layer reads at run time.
//!
//! ```toml
//! [world]
//! seed_path = "data/world.json"
//! start_room = "square"
//!
//! [storage]
//! data_dir = "data/players"
//!
//! [commands]
//! columns = 5
//!
//! [limits]
//! max_inventory = 20
//! max_input_len = 256
//!
//! [logging]
//! level = "info"
//! file = "mudcore.log"
//! ```
//!
//! Every section and key is optional; missing values fall back to the
//! defaults shown above.
//!
//! ```rust,no_run
//! use mudcore::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     config.validate()?;
//!     println!("players start in {}", config.world.start_room);
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorldConfig {
    /// JSON world seed loaded at startup.
    #[serde(default = "default_seed_path")]
    pub seed_path: String,
    /// Room new players are placed in.
    #[serde(default = "default_start_room")]
    pub start_room: String,
}

fn default_seed_path() -> String {
    "data/world.json".to_string()
}

fn default_start_room() -> String {
    "square".to_string()
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed_path: default_seed_path(),
            start_room: default_start_room(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Sled directory for player records.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    "data/players".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandsConfig {
    /// Names per line in the `commands` listing.
    #[serde(default = "default_columns")]
    pub columns: usize,
}

fn default_columns() -> usize {
    5
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LimitsConfig {
    #[serde(default = "default_max_inventory")]
    pub max_inventory: usize,
    /// Raw input is truncated to this many characters.
    #[serde(default = "default_max_input_len")]
    pub max_input_len: usize,
}

fn default_max_inventory() -> usize {
    20
}

fn default_max_input_len() -> usize {
    256
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_inventory: default_max_inventory(),
            max_input_len: default_max_input_len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: Some("mudcore.log".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reject values the command layer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.world.start_room.trim().is_empty() {
            bail!("world.start_room must not be empty");
        }
        if self.commands.columns == 0 {
            bail!("commands.columns must be at least 1");
        }
        if self.limits.max_inventory == 0 {
            bail!("limits.max_inventory must be at least 1");
        }
        if self.limits.max_input_len == 0 {
            bail!("limits.max_input_len must be at least 1");
        }
        match self.logging.level.to_ascii_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            other => Err(anyhow!("logging.level '{}' is not a log level", other)),
        }
    }
}
