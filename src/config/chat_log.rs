//! Chat log storage configuration.

use serde::Deserialize;

/// Chat log configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatLogConfig {
    /// Whether chat lines are recorded.
    #[serde(default)]
    pub enabled: bool,
    /// Directory for `<server>Database.json` documents.
    #[serde(default = "default_chat_log_directory")]
    pub directory: String,
}

impl Default for ChatLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_chat_log_directory(),
        }
    }
}

fn default_chat_log_directory() -> String {
    ".".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_log_config_default_disabled() {
        let config = ChatLogConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.directory, ".");
    }
}
