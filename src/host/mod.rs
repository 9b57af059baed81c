//! Boundary to the automation engine that owns the real game connection.
//!
//! Everything outbound (public chat, whispers) leaves through [`Host`].
//! Inbound chat arrives as [`ChatEvent`] values handed to
//! [`crate::Bot::handle_chat`].

mod console;
mod recording;

pub use console::{ConsoleHost, parse_console_line};
pub use recording::{Outbound, RecordingHost};

use crate::error::HostError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outbound primitives provided by the automation engine.
#[async_trait]
pub trait Host: Send + Sync {
    /// Send a public chat line.
    async fn chat(&self, text: &str) -> Result<(), HostError>;

    /// Send a private message to one player.
    async fn whisper(&self, username: &str, text: &str) -> Result<(), HostError>;

    /// The bot's own in-game name.
    fn username(&self) -> &str;
}

/// A chat line delivered by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Player who sent the line. `None` for server/system messages.
    pub sender: Option<String>,
    pub message: String,
    /// Engine-specific payload (e.g. the decoded chat component).
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl ChatEvent {
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: Some(sender.into()),
            message: message.into(),
            raw: serde_json::Value::Null,
        }
    }

    /// A line with no player sender.
    pub fn system(message: impl Into<String>) -> Self {
        Self {
            sender: None,
            message: message.into(),
            raw: serde_json::Value::Null,
        }
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }
}
