//! Per-invocation context handed to every command

use std::sync::Arc;

use discord_types::{DiscordMessage, OutgoingMessage, Permission};
use tokio::time::Instant;

use crate::api::DiscordApi;
use crate::deferred::Deferred;
use crate::error::{CommandError, CommandResult};
use crate::registry::CommandRegistry;
use crate::web::WebApis;

/// Process-wide state shared by all invocations. Read-only apart from the
/// deferred task counter.
#[derive(Debug, Clone)]
pub struct BotState {
    pub prefix: String,
    pub started_at: Instant,
    pub web: WebApis,
    pub deferred: Deferred,
}

impl BotState {
    pub fn new(prefix: impl Into<String>, web: WebApis) -> Self {
        Self {
            prefix: prefix.into(),
            started_at: Instant::now(),
            web,
            deferred: Deferred::new(),
        }
    }
}

/// Everything a command can see while it runs. Lives for one dispatch.
pub struct CommandContext<'a> {
    pub api: Arc<dyn DiscordApi>,
    pub message: &'a DiscordMessage,
    pub registry: &'a CommandRegistry,
    pub state: &'a BotState,
}

impl CommandContext<'_> {
    /// Reply to the invoking message.
    pub async fn reply(&self, message: impl Into<OutgoingMessage>) -> CommandResult<DiscordMessage> {
        Ok(self.api.reply(self.message, message.into()).await?)
    }

    /// Post to the invoking channel without referencing the invoking message.
    pub async fn send(&self, message: impl Into<OutgoingMessage>) -> CommandResult<DiscordMessage> {
        Ok(self
            .api
            .send_message(self.message.channel_id, message.into())
            .await?)
    }

    /// Guild the command was issued in. The dispatcher only routes guild
    /// messages, so this fails only when a command is run directly.
    pub fn guild_id(&self) -> CommandResult<u64> {
        self.message
            .guild_id
            .ok_or_else(|| CommandError::rejected("This command only works in a server."))
    }

    /// Reject unless the invoking member holds `permission`.
    pub async fn require_permission(&self, permission: Permission) -> CommandResult {
        let guild_id = self.guild_id()?;
        if self
            .api
            .has_permission(guild_id, self.message.author.id, permission)
            .await?
        {
            Ok(())
        } else {
            Err(CommandError::rejected("You lack permission."))
        }
    }
}
