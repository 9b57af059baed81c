//! Unified error handling for lodestone.
//!
//! Command handlers, registration and the host boundary each get their own
//! error enum. Scratch data assertions live in [`crate::scratch`] and chat
//! log failures in [`crate::chat_log`].

use crate::chat_log::ChatLogError;
use crate::scratch::ComparisonError;
use thiserror::Error;

// ============================================================================
// Host Errors (engine boundary)
// ============================================================================

/// Errors reported by the automation engine when sending outbound chat.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host is disconnected")]
    Disconnected,

    #[error("host rejected message: {0}")]
    Rejected(String),

    #[error("host io error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Handler Errors (command callbacks)
// ============================================================================

/// Errors a command callback may return.
///
/// The registry never catches these: whatever a handler returns comes back
/// out of `dispatch` unchanged.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error(transparent)]
    Comparison(#[from] ComparisonError<String, serde_json::Value>),

    #[error("chat log error: {0}")]
    ChatLog(#[from] ChatLogError),

    #[error("bad arguments: {0}")]
    BadArguments(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Host(_) => "host_error",
            Self::Comparison(_) => "comparison_failed",
            Self::ChatLog(_) => "chat_log_error",
            Self::BadArguments(_) => "bad_arguments",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised when a command cannot be registered.
///
/// In-code registrations are checked by the compiler; these come from
/// commands declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("cannot add custom command {name:?} with a response of type {kind}")]
    InvalidResponse { name: String, kind: &'static str },

    #[error("custom command {0:?} has no reply")]
    MissingResponse(String),
}

// ============================================================================
// Startup Errors
// ============================================================================

/// Errors building a [`crate::Bot`] from configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("failed to open chat log: {0}")]
    ChatLog(#[from] ChatLogError),
}
