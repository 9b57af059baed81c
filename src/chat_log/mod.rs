//! Per-server chat log.
//!
//! Every chat line the bot sees can be appended to a JSON document named
//! after the server, grouped by sender.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod json;
pub mod noop;

pub use json::JsonChatLog;
pub use noop::NoOpChatLog;

#[derive(Debug, Error)]
pub enum ChatLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// All messages recorded for one sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub username: String,
    pub messages: Vec<String>,
}

#[async_trait]
pub trait ChatLogProvider: Send + Sync {
    /// Append one line for `sender`.
    async fn append(&self, sender: &str, message: &str) -> Result<(), ChatLogError>;

    /// Messages recorded for `username`, or `None` if there are none.
    async fn history(&self, username: &str) -> Result<Option<Vec<String>>, ChatLogError>;

    /// Drop every record.
    async fn clear(&self) -> Result<(), ChatLogError>;
}

/// Key identifying a server's log: host lower-cased with dots removed.
pub fn server_key(host: &str) -> String {
    host.to_lowercase().replace('.', "")
}

/// Path of the chat log document for `host` inside `dir`.
pub fn database_path(dir: &Path, host: &str) -> PathBuf {
    dir.join(format!("{}Database.json", server_key(host)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_key_strips_dots_and_case() {
        assert_eq!(server_key("Play.Example.NET"), "playexamplenet");
        assert_eq!(server_key("localhost"), "localhost");
    }

    #[test]
    fn database_path_uses_server_key() {
        let path = database_path(Path::new("/var/lib/bot"), "mc.hypixel.net");
        assert_eq!(path, PathBuf::from("/var/lib/bot/mchypixelnetDatabase.json"));
    }
}
