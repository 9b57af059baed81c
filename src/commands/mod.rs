//! Chat-triggered commands.
//!
//! - [`Registry`]: prefix, command table and dispatch
//! - [`CommandContext`]: what a handler sees about the triggering line
//! - [`CommandHandler`] / [`Response`]: what a command does when it fires

mod context;
mod handler;
mod registry;

pub use context::CommandContext;
pub use handler::{CommandHandler, FnHandler, ReplyHandler, Response, handler_fn};
pub use registry::{DEFAULT_PREFIX, Ignored, PreparedCommand, Registry};
