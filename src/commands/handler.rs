//! Command handler trait and the response forms accepted at registration.

use super::context::CommandContext;
use crate::error::HandlerResult;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Something that runs when a command matches.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext) -> HandlerResult;
}

/// Sends a fixed text, publicly or as a whisper to the sender.
#[derive(Debug, Clone)]
pub struct ReplyHandler {
    text: String,
    whisper: bool,
}

impl ReplyHandler {
    pub fn new(text: impl Into<String>, whisper: bool) -> Self {
        Self {
            text: text.into(),
            whisper,
        }
    }
}

#[async_trait]
impl CommandHandler for ReplyHandler {
    async fn handle(&self, ctx: &CommandContext) -> HandlerResult {
        ctx.respond(&self.text, self.whisper).await
    }
}

/// Adapter turning an async closure into a [`CommandHandler`].
///
/// The closure receives an owned clone of the context.
pub struct FnHandler<F>(F);

/// Wrap an async closure as a handler.
///
/// ```ignore
/// bot.register_command("ping", None, handler_fn(|ctx| async move {
///     ctx.respond("pong", false).await
/// }));
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    FnHandler(f)
}

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, ctx: &CommandContext) -> HandlerResult {
        (self.0)(ctx.clone()).await
    }
}

/// What a registration should do when the command fires.
#[derive(Clone)]
pub enum Response {
    /// Fixed text, sent to chat or whispered back to the sender.
    Reply { text: String, whisper: bool },
    /// Arbitrary handler.
    Handler(Arc<dyn CommandHandler>),
}

impl Response {
    pub fn reply(text: impl Into<String>) -> Self {
        Self::Reply {
            text: text.into(),
            whisper: false,
        }
    }

    pub fn whisper(text: impl Into<String>) -> Self {
        Self::Reply {
            text: text.into(),
            whisper: true,
        }
    }

    pub fn handler(handler: impl CommandHandler + 'static) -> Self {
        Self::Handler(Arc::new(handler))
    }

    pub(crate) fn into_handler(self) -> Arc<dyn CommandHandler> {
        match self {
            Self::Reply { text, whisper } => Arc::new(ReplyHandler::new(text, whisper)),
            Self::Handler(handler) => handler,
        }
    }
}

impl From<&str> for Response {
    fn from(text: &str) -> Self {
        Self::reply(text)
    }
}

impl From<String> for Response {
    fn from(text: String) -> Self {
        Self::reply(text)
    }
}

impl<F> From<FnHandler<F>> for Response
where
    FnHandler<F>: CommandHandler + 'static,
{
    fn from(handler: FnHandler<F>) -> Self {
        Self::handler(handler)
    }
}

impl From<ReplyHandler> for Response {
    fn from(handler: ReplyHandler) -> Self {
        Self::Reply {
            text: handler.text,
            whisper: handler.whisper,
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reply { text, whisper } => f
                .debug_struct("Reply")
                .field("text", text)
                .field("whisper", whisper)
                .finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}
