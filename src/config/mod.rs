//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, BotConfig, LogConfig)
//! - [`chat_log`]: Chat log storage configuration (ChatLogConfig)
//! - [`commands`]: Commands declared in configuration (CommandBlock)
//! - [`validation`]: Startup checks

mod chat_log;
mod commands;
mod types;
mod validation;

pub use chat_log::ChatLogConfig;
pub use commands::CommandBlock;
pub use types::{BotConfig, Config, ConfigError, LogConfig, LogFormat};
pub use validation::{ValidationError, validate};
