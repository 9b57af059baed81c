//! lodestone - chat commands, scratch data and chat logs for Minecraft bots.
//!
//! The automation engine (connection, protocol, physics, pathfinding) is
//! external and reached through [`host::Host`]. This crate adds what sits on
//! top of it:
//!
//! - [`commands`]: prefix-triggered chat commands with optional sender filters
//! - [`scratch`]: a key/value store with assertion-style reads
//! - [`chat_log`]: per-server JSON chat logs
//! - [`Bot`]: the facade tying them to a host

pub mod bot;
pub mod chat_log;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod scratch;
pub mod telemetry;

pub use bot::{Bot, CommandArg};
pub use commands::{CommandContext, CommandHandler, Registry, Response, handler_fn};
pub use config::Config;
pub use error::{HandlerError, HandlerResult, HostError, RegistrationError, StartupError};
pub use host::{ChatEvent, Host};
pub use scratch::{ComparisonError, ScratchStore};
