//! Application configuration
//!
//! Loaded from a TOML file whose path is given on the command line:
//!
//! ```toml
//! [bot]
//! token = "123456:bot-api-token"
//!
//! [chat]
//! group_id = -1001234567890
//!
//! [database]
//! path = "/var/lib/credits-bot/credits.json"
//! ```
//!
//! `[database]` is optional and defaults to `credits.json` in the working
//! directory. Configuration problems are fatal: without a token and a store
//! path the process cannot start.

use crate::types::BotError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot account settings
    pub bot: BotConfig,

    /// Group chat settings
    pub chat: ChatConfig,

    /// Credit store settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Bot account settings
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot API token used to authenticate against the chat platform
    pub token: String,
}

/// Group chat settings
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Chat id of the group the bot serves; the shutdown farewell goes here
    pub group_id: i64,
}

/// Credit store settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the JSON credit store
    #[serde(default = "DatabaseConfig::default_path")]
    pub path: PathBuf,
}

impl DatabaseConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("credits.json")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: Self::default_path(),
        }
    }
}

impl Config {
    /// Load and validate the configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] if the file cannot be read, does not
    /// parse, or specifies an empty token.
    pub fn load(path: &Path) -> Result<Config, BotError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            BotError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&raw)?;

        if config.bot.token.is_empty() {
            return Err(BotError::config("bot token must not be empty"));
        }

        Ok(config)
    }
}
