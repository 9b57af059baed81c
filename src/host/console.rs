//! Host backed by the terminal.
//!
//! Outbound chat is written to stdout. The runner feeds stdin lines through
//! [`parse_console_line`] to produce chat events.

use super::{ChatEvent, Host};
use crate::error::HostError;
use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

pub struct ConsoleHost {
    username: String,
    out: Mutex<Stdout>,
}

impl ConsoleHost {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            out: Mutex::new(tokio::io::stdout()),
        }
    }

    async fn write_line(&self, line: String) -> Result<(), HostError> {
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl Host for ConsoleHost {
    async fn chat(&self, text: &str) -> Result<(), HostError> {
        self.write_line(format!("<{}> {}", self.username, text)).await
    }

    async fn whisper(&self, username: &str, text: &str) -> Result<(), HostError> {
        self.write_line(format!("[{} -> {}] {}", self.username, username, text))
            .await
    }

    fn username(&self) -> &str {
        &self.username
    }
}

/// Parse `sender: message` into a chat event.
///
/// A line without a `": "` separator is treated as a system message.
/// Blank lines yield `None`.
pub fn parse_console_line(line: &str) -> Option<ChatEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }
    match line.split_once(": ") {
        Some((sender, message)) if !sender.is_empty() && !sender.contains(' ') => {
            Some(ChatEvent::new(sender, message))
        }
        _ => Some(ChatEvent::system(line)),
    }
}
