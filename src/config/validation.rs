//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::path::Path;
use thiserror::Error;

/// Longest username the game accepts.
const MAX_USERNAME_LEN: usize = 16;

/// Validation errors for configuration.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("bot.host is required")]
    MissingHost,
    #[error("bot.port must not be 0")]
    InvalidPort,
    #[error("bot.username must be 1-16 characters, got {0}")]
    InvalidUsernameLength(usize),
    #[error("commands[{0}].name is required")]
    MissingCommandName(usize),
    #[error("chat_log.directory does not exist: {0}")]
    ChatLogDirectoryInvalid(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bot.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.bot.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    let username_len = config.bot.username.chars().count();
    if username_len == 0 || username_len > MAX_USERNAME_LEN {
        errors.push(ValidationError::InvalidUsernameLength(username_len));
    }

    for (index, block) in config.commands.iter().enumerate() {
        if block.name.trim().is_empty() {
            errors.push(ValidationError::MissingCommandName(index));
        }
    }

    if config.chat_log.enabled && !Path::new(&config.chat_log.directory).is_dir() {
        errors.push(ValidationError::ChatLogDirectoryInvalid(
            config.chat_log.directory.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
