//! Host that records outbound messages instead of sending them.
//!
//! Used for dry runs and tests.

use super::Host;
use crate::error::HostError;
use async_trait::async_trait;
use parking_lot::Mutex;

/// One outbound message captured by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Chat(String),
    Whisper { to: String, text: String },
}

pub struct RecordingHost {
    username: String,
    sent: Mutex<Vec<Outbound>>,
}

impl RecordingHost {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().clone()
    }

    /// Drain the captured messages.
    pub fn take(&self) -> Vec<Outbound> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new("lodestone")
    }
}

#[async_trait]
impl Host for RecordingHost {
    async fn chat(&self, text: &str) -> Result<(), HostError> {
        self.sent.lock().push(Outbound::Chat(text.to_string()));
        Ok(())
    }

    async fn whisper(&self, username: &str, text: &str) -> Result<(), HostError> {
        self.sent.lock().push(Outbound::Whisper {
            to: username.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn username(&self) -> &str {
        &self.username
    }
}
