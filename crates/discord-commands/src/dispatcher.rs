//! Routes inbound messages to registered commands.
//!
//! Each message goes through a fixed filter chain (bot author, guild-only,
//! prefix, command lookup) and then runs its command inside a single error
//! boundary. A failing or panicking command gets exactly one reply and never
//! affects other invocations.

#[path = "dispatcher_tests.rs"]
mod dispatcher_tests;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use discord_types::{DiscordMessage, OutgoingMessage};
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::api::DiscordApi;
use crate::context::{BotState, CommandContext};
use crate::error::CommandError;
use crate::registry::{CommandDescriptor, CommandRegistry};

/// Why a message was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    AutomatedSender,
    NotInGuild,
    MissingPrefix,
    EmptyCommand,
    UnknownCommand,
}

/// Result of running the filter chain over a message.
#[derive(Debug)]
pub enum Route<'r> {
    Skip(Skip),
    Invoke {
        descriptor: &'r CommandDescriptor,
        args: Vec<String>,
    },
}

/// What happened to a dispatched message.
#[derive(Debug)]
pub enum Outcome {
    Ignored(Skip),
    Completed { command: String },
    Failed { command: String, error: CommandError },
}

/// Split `content` into a lowercased command name and its arguments.
///
/// Returns `None` when the prefix is missing and `Some((None, _))` when
/// nothing follows it.
pub fn parse_invocation<'c>(
    content: &'c str,
    prefix: &str,
) -> Option<(Option<String>, impl Iterator<Item = &'c str>)> {
    let rest = content.strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace();
    let name = tokens.next().map(str::to_lowercase);
    Some((name, tokens))
}

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    state: Arc<BotState>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>, state: Arc<BotState>) -> Self {
        Self { registry, state }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn state(&self) -> &BotState {
        &self.state
    }

    /// Apply the filter chain, stopping at the first failing step.
    pub fn route(&self, message: &DiscordMessage) -> Route<'_> {
        if message.author.bot {
            return Route::Skip(Skip::AutomatedSender);
        }
        if message.guild_id.is_none() {
            return Route::Skip(Skip::NotInGuild);
        }
        let Some((name, args)) = parse_invocation(&message.content, &self.state.prefix) else {
            return Route::Skip(Skip::MissingPrefix);
        };
        let Some(name) = name else {
            return Route::Skip(Skip::EmptyCommand);
        };
        match self.registry.lookup(&name) {
            Some(descriptor) => Route::Invoke {
                descriptor,
                args: args.map(str::to_string).collect(),
            },
            None => Route::Skip(Skip::UnknownCommand),
        }
    }

    /// Route `message` and, if it names a command, run it.
    pub async fn dispatch(&self, api: Arc<dyn DiscordApi>, message: &DiscordMessage) -> Outcome {
        let (descriptor, args) = match self.route(message) {
            Route::Skip(skip) => return Outcome::Ignored(skip),
            Route::Invoke { descriptor, args } => (descriptor, args),
        };
        let command = descriptor.name.clone();

        debug!(
            "Dispatching '{}' from user {} in channel {} ({} args)",
            command,
            message.author.id,
            message.channel_id,
            args.len()
        );

        let ctx = CommandContext {
            api: api.clone(),
            message,
            registry: &self.registry,
            state: &self.state,
        };

        let result = AssertUnwindSafe(descriptor.command.execute(&ctx, &args))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(CommandError::Panicked(panic_message(&*panic))));

        match result {
            Ok(()) => Outcome::Completed { command },
            Err(error) => {
                log_failure(&command, &error);
                let reply = OutgoingMessage::text(error.user_reply());
                if let Err(e) = api.reply(message, reply).await {
                    error!("Failed to send failure reply for '{}': {}", command, e);
                }
                Outcome::Failed { command, error }
            }
        }
    }
}

fn log_failure(command: &str, error: &CommandError) {
    match error {
        CommandError::Rejected { reply, cause } => match cause {
            Some(cause) => warn!("Command '{}' rejected ({}): {}", command, reply, cause),
            None => info!("Command '{}' rejected: {}", command, reply),
        },
        CommandError::Api(api) if api.is_permanent() => {
            error!("Command '{}' failed [{:?}]: {}", command, api.code(), api);
        }
        CommandError::Api(api) => {
            warn!("Command '{}' failed [{:?}]: {}", command, api.code(), api);
        }
        other => error!("Command '{}' failed: {}", command, other),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
