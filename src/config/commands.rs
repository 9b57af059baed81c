//! Commands declared in configuration.

use serde::Deserialize;

use crate::commands::Response;
use crate::error::RegistrationError;

/// A `[[commands]]` block: a fixed reply, optionally sender-restricted.
///
/// ```toml
/// [[commands]]
/// name = "rules"
/// reply = "Be nice."
/// whisper = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CommandBlock {
    pub name: String,
    /// Only this player may trigger the command.
    #[serde(default)]
    pub sender: Option<String>,
    /// Reply text. Kept as a raw value so a wrong type is reported at
    /// registration with the command name attached.
    #[serde(default)]
    pub reply: Option<toml::Value>,
    /// Whisper the reply to the sender instead of chatting it.
    #[serde(default)]
    pub whisper: bool,
}

impl CommandBlock {
    /// The registration response for this block.
    pub fn response(&self) -> Result<Response, RegistrationError> {
        match &self.reply {
            Some(toml::Value::String(text)) => Ok(Response::Reply {
                text: text.clone(),
                whisper: self.whisper,
            }),
            Some(other) => Err(RegistrationError::InvalidResponse {
                name: self.name.clone(),
                kind: other.type_str(),
            }),
            None => Err(RegistrationError::MissingResponse(self.name.clone())),
        }
    }
}
