//! Configuration management

use crate::application::errors::ConfigError;
use crate::application::messaging::ReplyPolicy;
use crate::domain::entities::ListOrder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub counters: CountersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

/// Policy knobs for the counter store
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CountersConfig {
    /// Acknowledge auto-increments in chat
    pub notify_on_increment: bool,
    /// `count-desc` (default) or `name-asc`
    pub list_order: ListOrder,
    /// Overrides the host-supplied data directory
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "tally-bot".to_string(),
                prefix: "/".to_string(),
            },
            counters: CountersConfig {
                notify_on_increment: true,
                list_order: ListOrder::default(),
                data_dir: None,
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(dir) = std::env::var("TALLY_DATA_DIR") {
            config.counters.data_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Data directory for the plugin, with the conventional fallback
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.counters
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("./data/tally-bot"))
    }

    pub fn reply_policy(&self) -> ReplyPolicy {
        ReplyPolicy {
            notify_on_increment: self.counters.notify_on_increment,
            list_order: self.counters.list_order,
        }
    }
}
