//! Per-invocation command context.

use crate::bot::Bot;
use crate::error::HandlerResult;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Snapshot of the chat line that triggered a command.
///
/// Built fresh for every matched invocation and handed to the handler by
/// reference.
#[derive(Clone)]
pub struct CommandContext {
    /// Player who sent the line (empty for system lines).
    pub sender: String,
    /// The command token, without prefix.
    pub command: String,
    /// The whole line with the prefix removed.
    pub full_command: String,
    /// Whitespace-separated tokens after the command.
    pub arguments: Vec<String>,
    /// When the line was received.
    pub time: DateTime<Utc>,
    /// Engine payload of the original chat event.
    pub raw: serde_json::Value,
    /// The bot that received the line.
    pub bot: Arc<Bot>,
}

impl CommandContext {
    /// Reply in public chat, or privately to the sender when `whisper` is set.
    pub async fn respond(&self, text: &str, whisper: bool) -> HandlerResult {
        if whisper {
            self.respond_to(&self.sender, text).await
        } else {
            self.bot.chat(&[text]).await?;
            Ok(())
        }
    }

    /// Whisper `text` to an arbitrary player.
    pub async fn respond_to(&self, username: &str, text: &str) -> HandlerResult {
        self.bot.whisper(username, &[text]).await?;
        Ok(())
    }

    #[inline]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    /// Arguments from `index` onward joined by single spaces.
    pub fn rest(&self, index: usize) -> String {
        self.arguments
            .get(index..)
            .map(|args| args.join(" "))
            .unwrap_or_default()
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("sender", &self.sender)
            .field("command", &self.command)
            .field("full_command", &self.full_command)
            .field("arguments", &self.arguments)
            .field("time", &self.time)
            .field("server", &self.bot.server())
            .finish_non_exhaustive()
    }
}
