//! No-op chat log that discards all messages.
//!
//! Used when chat logging is disabled.

use super::{ChatLogError, ChatLogProvider};
use async_trait::async_trait;

pub struct NoOpChatLog;

#[async_trait]
impl ChatLogProvider for NoOpChatLog {
    async fn append(&self, _sender: &str, _message: &str) -> Result<(), ChatLogError> {
        Ok(())
    }

    async fn history(&self, _username: &str) -> Result<Option<Vec<String>>, ChatLogError> {
        Ok(None)
    }

    async fn clear(&self) -> Result<(), ChatLogError> {
        Ok(())
    }
}
