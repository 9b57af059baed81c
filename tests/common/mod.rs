//! Shared helpers for integration tests.

#![allow(dead_code)]

use lodestone::host::{Outbound, RecordingHost};
use lodestone::{Bot, Config};
use std::path::Path;
use std::sync::Arc;

/// A bot wired to a recording host, plus the host for assertions.
pub struct TestBot {
    pub bot: Arc<Bot>,
    pub host: Arc<RecordingHost>,
}

impl TestBot {
    /// Bot with default settings on `server`.
    pub fn new(server: &str) -> Self {
        let host = Arc::new(RecordingHost::new("lodestone"));
        let bot = Bot::new(host.clone(), server);
        Self { bot, host }
    }

    /// Bot built from a TOML snippet.
    pub async fn from_toml(toml_src: &str) -> Self {
        let config: Config = toml::from_str(toml_src).expect("Failed to parse test config");
        Self::from_config(&config).await
    }

    pub async fn from_config(config: &Config) -> Self {
        let host = Arc::new(RecordingHost::new(config.bot.username.as_str()));
        let bot = Bot::from_config(host.clone(), config)
            .await
            .expect("Failed to build bot");
        Self { bot, host }
    }

    /// Send a chat line from `sender` and return everything the bot sent.
    pub async fn say(&self, sender: &str, message: &str) -> Vec<Outbound> {
        self.bot
            .handle_chat(lodestone::ChatEvent::new(sender, message))
            .await
            .expect("Command handler failed");
        self.host.take()
    }
}

/// Config with chat logging into `dir`.
pub fn logging_config(dir: &Path, host: &str) -> Config {
    let mut config = Config::default();
    config.bot.host = host.to_string();
    config.chat_log.enabled = true;
    config.chat_log.directory = dir.display().to_string();
    config
}

pub fn chat(text: &str) -> Outbound {
    Outbound::Chat(text.to_string())
}

pub fn whisper(to: &str, text: &str) -> Outbound {
    Outbound::Whisper {
        to: to.to_string(),
        text: text.to_string(),
    }
}
