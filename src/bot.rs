//! The bot facade.
//!
//! A [`Bot`] owns one command registry, one scratch store and one chat log,
//! and talks to the automation engine only through its [`Host`]. It is built
//! once and shared as `Arc<Bot>`; command handlers reach it through
//! [`CommandContext::bot`](crate::commands::CommandContext).

use crate::chat_log::{self, ChatLogError, ChatLogProvider, JsonChatLog, NoOpChatLog};
use crate::commands::{Registry, Response};
use crate::config::Config;
use crate::error::{HandlerResult, HostError, StartupError};
use crate::host::{ChatEvent, Host};
use crate::scratch::{ComparisonError, ScratchStore};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Built-in command answering with the crate version.
pub const BUILTIN_VERSION_COMMAND: &str = "@!version";

/// Sender name recorded for chat lines without a player.
pub const UNKNOWN_SENDER: &str = "unknown";

pub struct Bot {
    host: Arc<dyn Host>,
    server: String,
    registry: RwLock<Registry>,
    scratch: Mutex<ScratchStore<String, Value>>,
    chat_log: Arc<dyn ChatLogProvider>,
    /// Directory holding chat log documents; `None` when logging is off.
    chat_log_dir: Option<PathBuf>,
}

impl Bot {
    /// Create a bot for `server` with default settings and chat logging off.
    pub fn new(host: Arc<dyn Host>, server: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            host,
            server: server.into(),
            registry: RwLock::new(Registry::new()),
            scratch: Mutex::new(ScratchStore::new()),
            chat_log: Arc::new(NoOpChatLog),
            chat_log_dir: None,
        })
    }

    /// Create a bot from configuration: prefix, chat log, configured
    /// commands and the built-in version command.
    pub async fn from_config(host: Arc<dyn Host>, config: &Config) -> Result<Arc<Self>, StartupError> {
        let (chat_log, chat_log_dir) = if config.chat_log.enabled {
            let dir = PathBuf::from(&config.chat_log.directory);
            let path = chat_log::database_path(&dir, &config.bot.host);
            info!(path = %path.display(), "Chat logging enabled");
            let log: Arc<dyn ChatLogProvider> = Arc::new(JsonChatLog::open(path).await?);
            (log, Some(dir))
        } else {
            let log: Arc<dyn ChatLogProvider> = Arc::new(NoOpChatLog);
            (log, None)
        };

        let mut registry = Registry::with_prefix(config.bot.prefix.as_str());
        registry.register(
            BUILTIN_VERSION_COMMAND,
            None,
            Response::whisper(env!("CARGO_PKG_VERSION")),
        );
        for block in &config.commands {
            registry.register_block(block)?;
        }
        info!(
            commands = registry.len(),
            prefix = %registry.prefix(),
            "Command registry ready"
        );

        Ok(Arc::new(Self {
            host,
            server: config.bot.host.clone(),
            registry: RwLock::new(registry),
            scratch: Mutex::new(ScratchStore::new()),
            chat_log,
            chat_log_dir,
        }))
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// Host name of the server this bot is connected to.
    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn username(&self) -> &str {
        self.host.username()
    }

    pub fn chat_logging_enabled(&self) -> bool {
        self.chat_log_dir.is_some()
    }

    // ------------------------------------------------------------------
    // Inbound chat
    // ------------------------------------------------------------------

    /// Handle one chat line from the engine.
    ///
    /// Appends the line to the chat log when logging is on, then dispatches
    /// it as a command. A handler error is returned to the caller untouched.
    pub async fn handle_chat(self: &Arc<Self>, event: ChatEvent) -> HandlerResult {
        let ChatEvent { sender, message, raw } = event;
        let sender = sender.unwrap_or_default();

        if self.chat_logging_enabled() {
            let logged_as = if sender.is_empty() { UNKNOWN_SENDER } else { sender.as_str() };
            info!(target: "lodestone::chat", sender = %logged_as, message = %message, "Chat");
            if let Err(e) = self.chat_log.append(logged_as, &message).await {
                error!(error = %e, "Failed to append chat log");
            }
        }

        // The read guard is a temporary and is released before `run` awaits.
        let prepared = self
            .registry
            .read()
            .prepare(&sender, &message, Utc::now(), raw, self);
        match prepared {
            Ok(command) => command.run().await,
            Err(_) => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Outbound chat
    // ------------------------------------------------------------------

    /// Send `parts` joined by single spaces to public chat.
    pub async fn chat(&self, parts: &[&str]) -> Result<(), HostError> {
        self.host.chat(&parts.join(" ")).await
    }

    /// Whisper `parts` joined by single spaces to `username`.
    pub async fn whisper(&self, username: &str, parts: &[&str]) -> Result<(), HostError> {
        self.host.whisper(username, &parts.join(" ")).await
    }

    /// Run a slash command, e.g. `command("tp", &["Steve".into(), 10.into()])`.
    pub async fn command(&self, name: &str, args: &[CommandArg]) -> Result<(), HostError> {
        let line = format_command(name, args);
        self.chat(&[line.as_str()]).await
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn prefix(&self) -> String {
        self.registry.read().prefix().to_string()
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.registry.write().set_prefix(prefix);
    }

    /// See [`Registry::register`].
    pub fn register_command(
        &self,
        name: impl Into<String>,
        sender: Option<&str>,
        response: impl Into<Response>,
    ) -> bool {
        self.registry.write().register(name, sender, response)
    }

    pub fn unregister_command(&self, name: &str) -> bool {
        self.registry.write().unregister(name)
    }

    pub fn command_names(&self) -> Vec<String> {
        self.registry
            .read()
            .command_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn command_stats(&self) -> Vec<(String, u64)> {
        self.registry.read().command_stats()
    }

    // ------------------------------------------------------------------
    // Scratch data
    // ------------------------------------------------------------------

    /// Store `value` under `key` and hand it back.
    pub fn set_data(&self, key: impl Into<String>, value: impl Into<Value>) -> Value {
        self.scratch.lock().set(key.into(), value.into()).clone()
    }

    pub fn get_data(&self, key: &str) -> Option<Value> {
        self.scratch.lock().get(key).cloned()
    }

    pub fn get_data_or(&self, key: &str, default: Option<Value>) -> Option<Value> {
        self.scratch.lock().get_or(key, default)
    }

    /// Fetch `key` (or `default`) and assert it equals `expected`.
    pub fn get_data_checked(
        &self,
        key: &str,
        default: Option<Value>,
        expected: Option<Value>,
    ) -> Result<Option<Value>, ComparisonError<String, Value>> {
        self.scratch.lock().get_checked(key, default, expected)
    }

    pub fn remove_data(&self, key: &str) -> Option<Value> {
        self.scratch.lock().remove(key)
    }

    // ------------------------------------------------------------------
    // Chat log
    // ------------------------------------------------------------------

    /// Messages logged for `username` on `server` (this bot's server when
    /// `None`). Empty when logging is off or nothing was recorded.
    pub async fn chat_history(
        &self,
        username: &str,
        server: Option<&str>,
    ) -> Result<Vec<String>, ChatLogError> {
        let Some(dir) = &self.chat_log_dir else {
            warn!("Chat logging is not enabled, set chat_log.enabled = true in the bot config");
            return Ok(Vec::new());
        };

        let server = server.filter(|s| !s.is_empty()).unwrap_or(self.server.as_str());
        let history = if chat_log::server_key(server) == chat_log::server_key(&self.server) {
            self.chat_log.history(username).await?
        } else {
            match JsonChatLog::open_existing(chat_log::database_path(dir, server)).await? {
                Some(log) => log.history(username).await?,
                None => {
                    warn!(server = %server, "Server has no chat log");
                    return Ok(Vec::new());
                }
            }
        };

        Ok(history.unwrap_or_else(|| {
            warn!(username = %username, server = %server, "User has no chat history");
            Vec::new()
        }))
    }

    /// Remove every record from this server's chat log.
    pub async fn clear_logs(&self) -> Result<(), ChatLogError> {
        if !self.chat_logging_enabled() {
            warn!("Chat logging is not enabled, set chat_log.enabled = true in the bot config");
            return Ok(());
        }
        self.chat_log.clear().await?;
        info!(server = %self.server, "Chat log cleared");
        Ok(())
    }
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("server", &self.server)
            .field("username", &self.username())
            .field("chat_log_dir", &self.chat_log_dir)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Slash command formatting
// ============================================================================

/// One argument of a slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandArg {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Spliced in place, each element formatted on its own.
    Many(Vec<CommandArg>),
}

impl From<&str> for CommandArg {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CommandArg {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for CommandArg {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for CommandArg {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for CommandArg {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<f64> for CommandArg {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl<T: Into<CommandArg>> From<Vec<T>> for CommandArg {
    fn from(items: Vec<T>) -> Self {
        Self::Many(items.into_iter().map(Into::into).collect())
    }
}

impl CommandArg {
    fn push_formatted(&self, out: &mut Vec<String>) {
        match self {
            Self::Text(s) if s.contains(' ') => out.push(format!("\"{}\"", s.replace('"', "\\\""))),
            Self::Text(s) => out.push(s.clone()),
            Self::Bool(b) => out.push(b.to_string()),
            Self::Int(n) => out.push(n.to_string()),
            Self::Float(n) => out.push(n.to_string()),
            Self::Many(items) => items.iter().for_each(|item| item.push_formatted(out)),
        }
    }
}

/// Render `/name arg...`, quoting text arguments that contain spaces.
pub fn format_command(name: &str, args: &[CommandArg]) -> String {
    let mut parts = vec![format!("/{name}")];
    for arg in args {
        arg.push_formatted(&mut parts);
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handler_fn;
    use crate::host::{Outbound, RecordingHost};
    use serde_json::json;

    fn bot() -> (Arc<Bot>, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::new("lodestone"));
        (Bot::new(host.clone(), "mc.example.net"), host)
    }

    #[test]
    fn format_command_quotes_and_flattens() {
        assert_eq!(format_command("spawn", &[]), "/spawn");
        assert_eq!(
            format_command("tp", &["my home".into(), true.into(), 10.into()]),
            "/tp \"my home\" true 10"
        );
        assert_eq!(
            format_command("say", &["he said \"hi there\"".into()]),
            "/say \"he said \\\"hi there\\\"\""
        );
        assert_eq!(
            format_command("give", &[vec!["Steve", "diamond"].into(), 64.into()]),
            "/give Steve diamond 64"
        );
    }

    #[tokio::test]
    async fn chat_and_whisper_join_parts() {
        let (bot, host) = bot();
        bot.chat(&["a", "b"]).await.unwrap();
        bot.chat(&[]).await.unwrap();
        bot.whisper("alice", &["going", "home", "now"]).await.unwrap();

        assert_eq!(
            host.take(),
            vec![
                Outbound::Chat("a b".into()),
                Outbound::Chat(String::new()),
                Outbound::Whisper {
                    to: "alice".into(),
                    text: "going home now".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn command_sends_formatted_chat() {
        let (bot, host) = bot();
        bot.command("tp", &["my home".into(), true.into()]).await.unwrap();
        assert_eq!(host.take(), vec![Outbound::Chat("/tp \"my home\" true".into())]);
    }

    #[test]
    fn scratch_data_round_trip() {
        let (bot, _) = bot();
        assert_eq!(bot.set_data("k", "v"), json!("v"));
        assert_eq!(bot.get_data("k"), Some(json!("v")));
        assert_eq!(bot.get_data_or("missing", Some(json!("d"))), Some(json!("d")));
        assert_eq!(bot.get_data_checked("missing", None, None), Ok(None));

        let err = bot.get_data_checked("k", None, Some(json!("other"))).unwrap_err();
        assert_eq!(err.actual, Some(json!("v")));
        assert_eq!(err.expected, Some(json!("other")));

        assert_eq!(bot.remove_data("k"), Some(json!("v")));
        assert_eq!(bot.get_data("k"), None);
    }

    #[tokio::test]
    async fn handle_chat_dispatches_and_ignores() {
        let (bot, host) = bot();
        bot.register_command("time", None, "noon");

        bot.handle_chat(ChatEvent::new("alice", "!time")).await.unwrap();
        bot.handle_chat(ChatEvent::new("bob", "time")).await.unwrap();
        bot.handle_chat(ChatEvent::system("!time")).await.unwrap();

        assert_eq!(
            host.take(),
            vec![Outbound::Chat("noon".into()), Outbound::Chat("noon".into())]
        );
    }

    #[tokio::test]
    async fn handlers_can_use_scratch_data() {
        let (bot, host) = bot();
        bot.register_command(
            "remember",
            None,
            handler_fn(|ctx| async move {
                let value = ctx.rest(0);
                ctx.bot.set_data(ctx.sender.clone(), value);
                Ok(())
            }),
        );
        bot.register_command(
            "recall",
            None,
            handler_fn(|ctx| async move {
                let value = ctx.bot.get_data(&ctx.sender).unwrap_or(Value::Null);
                ctx.respond(&value.to_string(), true).await
            }),
        );

        bot.handle_chat(ChatEvent::new("alice", "!remember the cake")).await.unwrap();
        bot.handle_chat(ChatEvent::new("alice", "!recall")).await.unwrap();

        assert_eq!(
            host.take(),
            vec![Outbound::Whisper {
                to: "alice".into(),
                text: "\"the cake\"".into()
            }]
        );
    }

    #[tokio::test]
    async fn handlers_can_change_the_prefix() {
        let (bot, _) = bot();
        bot.register_command(
            "prefix",
            Some("admin"),
            handler_fn(|ctx| async move {
                if let Some(p) = ctx.arg(0) {
                    ctx.bot.set_prefix(p);
                }
                Ok(())
            }),
        );

        bot.handle_chat(ChatEvent::new("admin", "!prefix ?")).await.unwrap();
        assert_eq!(bot.prefix(), "?");
    }

    #[tokio::test]
    async fn chat_history_without_logging_is_empty() {
        let (bot, _) = bot();
        assert!(!bot.chat_logging_enabled());
        assert!(bot.chat_history("alice", None).await.unwrap().is_empty());
        bot.clear_logs().await.unwrap();
    }
}
