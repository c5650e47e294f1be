//! The Discord operations commands are allowed to perform.
//!
//! Implemented by the serenity adapter in `discord-bot` and by
//! [`crate::mock::MockDiscord`] in tests.

use async_trait::async_trait;
use discord_types::{
    BotStats, DiscordGuild, DiscordMessage, DiscordRole, DiscordUser, OutgoingMessage, Permission,
};

use crate::error::ApiError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// The bot's own user.
    async fn current_user(&self) -> ApiResult<DiscordUser>;

    /// Guild and user counts from the gateway cache.
    fn stats(&self) -> BotStats;

    async fn send_message(
        &self,
        channel_id: u64,
        message: OutgoingMessage,
    ) -> ApiResult<DiscordMessage>;

    /// Send `message` to the channel of `to`, as a reply referencing it.
    async fn reply(&self, to: &DiscordMessage, message: OutgoingMessage)
        -> ApiResult<DiscordMessage>;

    async fn edit_message(&self, channel_id: u64, message_id: u64, content: &str)
        -> ApiResult<()>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> ApiResult<()>;

    /// Delete the `count` most recent messages of a channel in one request.
    /// Returns the number of messages deleted.
    async fn bulk_delete(&self, channel_id: u64, count: u8) -> ApiResult<usize>;

    /// React with a unicode emoji.
    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> ApiResult<()>;

    async fn guild(&self, guild_id: u64) -> ApiResult<DiscordGuild>;

    /// True if the member holds `permission`, through a role, through
    /// `ADMINISTRATOR`, or by owning the guild.
    async fn has_permission(
        &self,
        guild_id: u64,
        user_id: u64,
        permission: Permission,
    ) -> ApiResult<bool>;

    async fn kick_member(&self, guild_id: u64, user_id: u64) -> ApiResult<()>;

    async fn ban_member(&self, guild_id: u64, user_id: u64) -> ApiResult<()>;

    async fn roles(&self, guild_id: u64) -> ApiResult<Vec<DiscordRole>>;

    async fn add_member_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> ApiResult<()>;

    async fn remove_member_role(&self, guild_id: u64, user_id: u64, role_id: u64)
        -> ApiResult<()>;

    /// Allow or deny `SEND_MESSAGES` for `@everyone` in a channel.
    async fn set_everyone_can_send(
        &self,
        guild_id: u64,
        channel_id: u64,
        allowed: bool,
    ) -> ApiResult<()>;

    /// Per-user rate limit of a channel, in seconds (0 disables).
    async fn set_slowmode(&self, channel_id: u64, seconds: u16) -> ApiResult<()>;
}
