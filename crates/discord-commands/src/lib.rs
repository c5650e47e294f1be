//! Prefix-command core for the Discord bot.
//!
//! A [`CommandRegistry`] maps command names to [`Command`] implementations and
//! a [`Dispatcher`] routes inbound guild messages to them. Commands talk to
//! Discord only through the [`DiscordApi`] trait, so the whole core runs
//! against [`mock::MockDiscord`] in tests.

pub mod api;
pub mod commands;
pub mod context;
pub mod deferred;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod web;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

#[cfg(test)]
mod testing;

pub use api::{ApiResult, DiscordApi};
pub use context::{BotState, CommandContext};
pub use deferred::{Deferred, DeferredHandle};
pub use dispatcher::{Dispatcher, Outcome, Route, Skip};
pub use error::{ApiError, CommandError, CommandResult};
pub use registry::{Command, CommandDescriptor, CommandRegistry};
pub use web::{WebApiConfig, WebApis};
