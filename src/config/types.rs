//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::chat_log::ChatLogConfig;
use super::commands::CommandBlock;
use crate::commands::DEFAULT_PREFIX;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server and identity.
    #[serde(default)]
    pub bot: BotConfig,
    /// Chat log storage.
    #[serde(default)]
    pub chat_log: ChatLogConfig,
    /// Log output.
    #[serde(default)]
    pub log: LogConfig,
    /// Commands with fixed replies.
    #[serde(default)]
    pub commands: Vec<CommandBlock>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server and identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Server host name (e.g., "mc.example.net"). Also names the chat log.
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port (default: 25565).
    #[serde(default = "default_port")]
    pub port: u16,
    /// In-game username.
    #[serde(default = "default_username")]
    pub username: String,
    /// Command prefix (default: "!").
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: default_username(),
            prefix: default_prefix(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    25565
}

fn default_username() -> String {
    "lodestone".to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
///
/// `RUST_LOG` takes precedence over `level` when set.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
