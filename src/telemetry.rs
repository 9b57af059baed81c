//! Telemetry utilities for command timing and tracing spans.

use std::time::Instant;

/// Guard for timing command execution and recording metrics.
///
/// Records command latency when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(&self.command, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span for one command invocation.
    pub fn command(name: &str, sender: &str, server: &str) -> Span {
        debug_span!("bot.command", command = %name, sender = %sender, server = %server)
    }

    /// Span covering a bot session on one server.
    pub fn session(server: &str, username: &str) -> Span {
        info_span!("session", server = %server, username = %username)
    }
}
