//! Command registry and dispatch.
//!
//! The `Registry` owns the command prefix and the command table, and keeps
//! per-command usage counters.

use super::context::CommandContext;
use super::handler::{CommandHandler, Response};
use crate::bot::Bot;
use crate::config::CommandBlock;
use crate::error::{HandlerResult, RegistrationError};
use crate::telemetry::{CommandTimer, spans};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Instrument, debug, trace, warn};

/// Prefix used until [`Registry::set_prefix`] is called.
pub const DEFAULT_PREFIX: &str = "!";

struct CommandEntry {
    sender: Option<String>,
    handler: Arc<dyn CommandHandler>,
}

/// Why a chat line did not dispatch anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// The line does not start with the prefix.
    NoPrefix,
    /// Nothing but whitespace after the prefix.
    EmptyCommand,
    /// No command registered under that name.
    UnknownCommand,
    /// The command is restricted to another sender.
    SenderFiltered,
}

impl Ignored {
    /// Static label for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoPrefix => "no_prefix",
            Self::EmptyCommand => "empty_command",
            Self::UnknownCommand => "unknown_command",
            Self::SenderFiltered => "sender_filtered",
        }
    }
}

/// A matched command, ready to run.
pub struct PreparedCommand {
    handler: Arc<dyn CommandHandler>,
    ctx: CommandContext,
}

impl PreparedCommand {
    pub fn context(&self) -> &CommandContext {
        &self.ctx
    }

    /// Run the handler. Its result is returned as-is.
    pub async fn run(self) -> HandlerResult {
        let span = spans::command(&self.ctx.command, &self.ctx.sender, self.ctx.bot.server());
        let _timer = CommandTimer::new(&self.ctx.command);

        let result = self.handler.handle(&self.ctx).instrument(span).await;

        if let Err(ref e) = result {
            crate::metrics::record_command_error(&self.ctx.command, e.error_code());
            debug!(command = %self.ctx.command, error = %e, "Command error");
        }
        result
    }
}

/// Registry of chat commands.
pub struct Registry {
    prefix: String,
    commands: HashMap<String, CommandEntry>,
    /// Usage counters, kept across re-registration of the same name.
    command_counts: HashMap<String, Arc<AtomicU64>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let mut registry = Self {
            prefix: String::new(),
            commands: HashMap::new(),
            command_counts: HashMap::new(),
        };
        registry.set_prefix(prefix);
        registry
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Replace the prefix for all subsequent chat lines.
    ///
    /// An empty prefix is accepted, but then every chat line goes through
    /// command lookup and ordinary chat can trigger commands.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if prefix.is_empty() {
            warn!("Command prefix set to empty string; every chat line will be parsed as a command");
        }
        debug!(prefix = %prefix, "Command prefix set");
        self.prefix = prefix;
    }

    /// Register `name`, replacing any earlier registration.
    ///
    /// With `sender` set, only that player (exact, case-sensitive match) can
    /// trigger the command. Returns whether an earlier entry was replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        sender: Option<&str>,
        response: impl Into<Response>,
    ) -> bool {
        let name = name.into();
        let entry = CommandEntry {
            sender: sender.map(str::to_string),
            handler: response.into().into_handler(),
        };
        self.command_counts
            .entry(name.clone())
            .or_insert_with(|| Arc::new(AtomicU64::new(0)));
        let replaced = self.commands.insert(name.clone(), entry).is_some();
        debug!(command = %name, sender = ?sender, replaced, "Registered command");
        replaced
    }

    /// Register a command declared in configuration.
    pub fn register_block(&mut self, block: &CommandBlock) -> Result<bool, RegistrationError> {
        let response = block.response()?;
        Ok(self.register(block.name.as_str(), block.sender.as_deref(), response))
    }

    /// Remove `name` and its usage counter.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.command_counts.remove(name);
        self.commands.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Command usage statistics, most used first. Unused commands are left out.
    pub fn command_stats(&self) -> Vec<(String, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(cmd, count)| (cmd.clone(), count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }

    /// Match a chat line against the table without running anything.
    ///
    /// Does not hold on to `self`, so callers can release a lock on the
    /// registry before awaiting [`PreparedCommand::run`].
    pub fn prepare(
        &self,
        sender: &str,
        raw_message: &str,
        time: DateTime<Utc>,
        raw: serde_json::Value,
        bot: &Arc<Bot>,
    ) -> Result<PreparedCommand, Ignored> {
        let outcome = self.resolve(sender, raw_message);
        crate::metrics::record_chat_outcome(match &outcome {
            Ok(_) => "dispatched",
            Err(reason) => reason.as_str(),
        });

        let (entry, body, command, arguments) = outcome.inspect_err(|reason| {
            trace!(sender = %sender, reason = reason.as_str(), "Chat line not dispatched");
        })?;

        if let Some(counter) = self.command_counts.get(command) {
            counter.fetch_add(1, Ordering::Relaxed);
        }

        Ok(PreparedCommand {
            handler: Arc::clone(&entry.handler),
            ctx: CommandContext {
                sender: sender.to_string(),
                command: command.to_string(),
                full_command: body.to_string(),
                arguments,
                time,
                raw,
                bot: Arc::clone(bot),
            },
        })
    }

    /// Dispatch a chat line: prefix check, lookup, sender filter, then the
    /// handler. Non-matching lines are a silent no-op.
    ///
    /// Borrows the registry for the whole handler run. [`Bot`] calls
    /// [`prepare`](Self::prepare) and [`PreparedCommand::run`] separately so
    /// its registry lock is released before the handler is awaited.
    pub async fn dispatch(
        &self,
        sender: &str,
        raw_message: &str,
        time: DateTime<Utc>,
        raw: serde_json::Value,
        bot: &Arc<Bot>,
    ) -> HandlerResult {
        match self.prepare(sender, raw_message, time, raw, bot) {
            Ok(prepared) => prepared.run().await,
            Err(_) => Ok(()),
        }
    }

    fn resolve<'m>(
        &self,
        sender: &str,
        raw_message: &'m str,
    ) -> Result<(&CommandEntry, &'m str, &'m str, Vec<String>), Ignored> {
        let body = raw_message
            .strip_prefix(self.prefix.as_str())
            .ok_or(Ignored::NoPrefix)?;

        let mut tokens = body.split_whitespace();
        let command = tokens.next().ok_or(Ignored::EmptyCommand)?;
        let entry = self.commands.get(command).ok_or(Ignored::UnknownCommand)?;

        if let Some(ref allowed) = entry.sender
            && (sender.is_empty() || allowed != sender)
        {
            return Err(Ignored::SenderFiltered);
        }

        Ok((entry, body, command, tokens.map(str::to_string).collect()))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handler_fn;
    use crate::error::HandlerError;
    use crate::host::{Outbound, RecordingHost};
    use parking_lot::Mutex;

    fn bot() -> (Arc<Bot>, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::default());
        (Bot::new(host.clone(), "localhost"), host)
    }

    fn prepare(registry: &Registry, bot: &Arc<Bot>, sender: &str, line: &str) -> Result<PreparedCommand, Ignored> {
        registry.prepare(sender, line, Utc::now(), serde_json::Value::Null, bot)
    }

    #[test]
    fn default_prefix_is_bang() {
        assert_eq!(Registry::new().prefix(), "!");
    }

    #[test]
    fn splits_command_and_arguments() {
        let (bot, _) = bot();
        let mut registry = Registry::new();
        registry.register("tp", None, "ok");

        let prepared = prepare(&registry, &bot, "alice", "!tp  10 64\t-3").ok().unwrap();
        let ctx = prepared.context();
        assert_eq!(ctx.command, "tp");
        assert_eq!(ctx.full_command, "tp  10 64\t-3");
        assert_eq!(ctx.arguments, vec!["10", "64", "-3"]);
        assert_eq!(ctx.sender, "alice");
    }

    #[test]
    fn ignores_lines_without_prefix() {
        let (bot, _) = bot();
        let mut registry = Registry::new();
        registry.register("time", None, "noon");

        assert_eq!(prepare(&registry, &bot, "bob", "time").err(), Some(Ignored::NoPrefix));
        assert_eq!(prepare(&registry, &bot, "bob", " !time").err(), Some(Ignored::NoPrefix));
    }

    #[test]
    fn ignores_empty_and_unknown_commands() {
        let (bot, _) = bot();
        let registry = Registry::new();

        assert_eq!(prepare(&registry, &bot, "bob", "!").err(), Some(Ignored::EmptyCommand));
        assert_eq!(prepare(&registry, &bot, "bob", "!   ").err(), Some(Ignored::EmptyCommand));
        assert_eq!(prepare(&registry, &bot, "bob", "!nope").err(), Some(Ignored::UnknownCommand));
    }

    #[test]
    fn sender_filter_is_exact() {
        let (bot, _) = bot();
        let mut registry = Registry::new();
        registry.register("kick", Some("admin"), "bye");

        assert_eq!(prepare(&registry, &bot, "guest", "!kick x").err(), Some(Ignored::SenderFiltered));
        assert_eq!(prepare(&registry, &bot, "Admin", "!kick x").err(), Some(Ignored::SenderFiltered));
        assert_eq!(prepare(&registry, &bot, "", "!kick x").err(), Some(Ignored::SenderFiltered));
        assert!(prepare(&registry, &bot, "admin", "!kick x").is_ok());
    }

    #[test]
    fn custom_and_multichar_prefix() {
        let (bot, _) = bot();
        let mut registry = Registry::with_prefix("bot, ");
        registry.register("come", None, "coming");

        assert!(prepare(&registry, &bot, "a", "bot, come here").is_ok());
        assert_eq!(prepare(&registry, &bot, "a", "!come").err(), Some(Ignored::NoPrefix));

        registry.set_prefix("");
        assert!(prepare(&registry, &bot, "a", "come").is_ok());
    }

    #[test]
    fn reregistration_replaces_entry() {
        let mut registry = Registry::new();
        assert!(!registry.register("time", None, "noon"));
        assert!(registry.register("time", Some("admin"), "midnight"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.command_names(), vec!["time"]);

        assert!(registry.unregister("time"));
        assert!(!registry.contains("time"));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn fixed_reply_goes_to_chat() {
        let (bot, host) = bot();
        let mut registry = Registry::new();
        registry.register("time", None, "noon");

        registry
            .dispatch("alice", "!time", Utc::now(), serde_json::Value::Null, &bot)
            .await
            .unwrap();
        registry
            .dispatch("bob", "time", Utc::now(), serde_json::Value::Null, &bot)
            .await
            .unwrap();

        assert_eq!(host.take(), vec![Outbound::Chat("noon".into())]);
    }

    #[tokio::test]
    async fn whisper_reply_goes_to_sender() {
        let (bot, host) = bot();
        let mut registry = Registry::new();
        registry.register("secret", None, Response::whisper("42"));

        registry
            .dispatch("alice", "!secret", Utc::now(), serde_json::Value::Null, &bot)
            .await
            .unwrap();

        assert_eq!(
            host.take(),
            vec![Outbound::Whisper {
                to: "alice".into(),
                text: "42".into()
            }]
        );
    }

    #[tokio::test]
    async fn last_registration_wins() {
        let (bot, _) = bot();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();

        for label in ["first", "second"] {
            let calls = Arc::clone(&calls);
            registry.register(
                "go",
                None,
                handler_fn(move |_ctx| {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.lock().push(label);
                        Ok(())
                    }
                }),
            );
        }

        registry
            .dispatch("a", "!go", Utc::now(), serde_json::Value::Null, &bot)
            .await
            .unwrap();
        assert_eq!(*calls.lock(), vec!["second"]);
    }

    #[tokio::test]
    async fn handler_errors_propagate() {
        let (bot, _) = bot();
        let mut registry = Registry::new();
        registry.register(
            "fail",
            None,
            handler_fn(|_ctx| async { Err(HandlerError::Internal("boom".into())) }),
        );

        let err = registry
            .dispatch("a", "!fail", Utc::now(), serde_json::Value::Null, &bot)
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Internal(ref m) if m == "boom"));
    }

    #[tokio::test]
    async fn stats_count_dispatched_commands() {
        let (bot, _) = bot();
        let mut registry = Registry::new();
        registry.register("a", None, "1");
        registry.register("b", None, "2");
        registry.register("c", None, "3");

        for line in ["!a", "!b", "!b", "!x", "b"] {
            registry
                .dispatch("p", line, Utc::now(), serde_json::Value::Null, &bot)
                .await
                .unwrap();
        }

        assert_eq!(
            registry.command_stats(),
            vec![("b".to_string(), 2), ("a".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn unregister_drops_usage_stats() {
        let (bot, _) = bot();
        let mut registry = Registry::new();
        registry.register("x", None, "1");
        registry.register("y", None, "2");

        for line in ["!x", "!y"] {
            registry
                .dispatch("p", line, Utc::now(), serde_json::Value::Null, &bot)
                .await
                .unwrap();
        }
        assert!(registry.unregister("x"));

        assert_eq!(registry.command_stats(), vec![("y".to_string(), 1)]);

        registry.register("x", None, "again");
        registry
            .dispatch("p", "!x", Utc::now(), serde_json::Value::Null, &bot)
            .await
            .unwrap();
        assert!(registry.command_stats().contains(&("x".to_string(), 1)));
    }
}
