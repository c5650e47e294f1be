//! `DiscordApi` implemented over serenity's REST client and gateway cache

#[path = "api_tests.rs"]
mod api_tests;

use std::sync::Arc;

use async_trait::async_trait;
use discord_commands::{ApiResult, DiscordApi};
use discord_types::{
    BotStats, DiscordGuild, DiscordMessage, DiscordRole, DiscordUser, Embed, OutgoingMessage,
    Permission,
};
use serenity::builder::{CreateEmbed, CreateMessage, EditChannel, EditMessage, GetMessages};
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::channel::{PermissionOverwrite, PermissionOverwriteType, ReactionType};
use serenity::model::id::{ChannelId, GuildId, MessageId, RoleId, UserId};
use serenity::model::permissions::Permissions;
use tracing::debug;

use crate::convert::{convert_guild, convert_message, convert_role, convert_user};
use crate::errors::classify;

/// Serenity-backed Discord operations for one shard's context.
#[derive(Clone)]
pub struct SerenityApi {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityApi {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }
}

fn create_embed(embed: Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = embed.description {
        builder = builder.description(description);
    }
    if let Some(url) = embed.thumbnail {
        builder = builder.thumbnail(url);
    }
    if let Some(color) = embed.color {
        builder = builder.colour(color);
    }
    for field in embed.fields {
        builder = builder.field(field.name, field.value, field.inline);
    }
    builder
}

fn create_message(message: OutgoingMessage) -> CreateMessage {
    let mut builder = CreateMessage::new();
    if !message.content.is_empty() {
        builder = builder.content(message.content);
    }
    if !message.embeds.is_empty() {
        builder = builder.embeds(message.embeds.into_iter().map(create_embed).collect());
    }
    builder
}

/// Effective permission bits of a member: `@everyone` plus every role held.
pub fn granted_bits(
    everyone_role: u64,
    member_roles: &[u64],
    guild_roles: impl IntoIterator<Item = (u64, u64)>,
) -> u64 {
    guild_roles
        .into_iter()
        .filter(|(id, _)| *id == everyone_role || member_roles.contains(id))
        .fold(0, |acc, (_, bits)| acc | bits)
}

/// New `(allow, deny)` for the `@everyone` overwrite with only
/// `SEND_MESSAGES` changed.
pub fn send_messages_overwrite(
    existing: Option<(Permissions, Permissions)>,
    allowed: bool,
) -> (Permissions, Permissions) {
    let (mut allow, mut deny) = existing.unwrap_or((Permissions::empty(), Permissions::empty()));
    if allowed {
        allow.insert(Permissions::SEND_MESSAGES);
        deny.remove(Permissions::SEND_MESSAGES);
    } else {
        allow.remove(Permissions::SEND_MESSAGES);
        deny.insert(Permissions::SEND_MESSAGES);
    }
    (allow, deny)
}

#[async_trait]
impl DiscordApi for SerenityApi {
    async fn current_user(&self) -> ApiResult<DiscordUser> {
        let user = self.http.get_current_user().await.map_err(classify)?;
        Ok(convert_user(&user))
    }

    fn stats(&self) -> BotStats {
        BotStats {
            guilds: self.cache.guild_count(),
            users: self.cache.user_count(),
        }
    }

    async fn send_message(
        &self,
        channel_id: u64,
        message: OutgoingMessage,
    ) -> ApiResult<DiscordMessage> {
        let sent = ChannelId::new(channel_id)
            .send_message(&*self.http, create_message(message))
            .await
            .map_err(classify)?;
        Ok(convert_message(&sent))
    }

    async fn reply(
        &self,
        to: &DiscordMessage,
        message: OutgoingMessage,
    ) -> ApiResult<DiscordMessage> {
        let channel = ChannelId::new(to.channel_id);
        let builder = create_message(message).reference_message((channel, MessageId::new(to.id)));
        let sent = channel
            .send_message(&*self.http, builder)
            .await
            .map_err(classify)?;
        Ok(convert_message(&sent))
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> ApiResult<()> {
        ChannelId::new(channel_id)
            .edit_message(
                &*self.http,
                MessageId::new(message_id),
                EditMessage::new().content(content),
            )
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> ApiResult<()> {
        ChannelId::new(channel_id)
            .delete_message(&*self.http, MessageId::new(message_id))
            .await
            .map_err(classify)
    }

    async fn bulk_delete(&self, channel_id: u64, count: u8) -> ApiResult<usize> {
        let channel = ChannelId::new(channel_id);
        let ids: Vec<MessageId> = channel
            .messages(&*self.http, GetMessages::new().limit(count))
            .await
            .map_err(classify)?
            .iter()
            .map(|m| m.id)
            .collect();
        debug!(
            "Bulk deleting {} of {} requested messages in {}",
            ids.len(),
            count,
            channel_id
        );
        match ids.as_slice() {
            [] => {}
            [only] => channel
                .delete_message(&*self.http, *only)
                .await
                .map_err(classify)?,
            _ => channel
                .delete_messages(&*self.http, ids.clone())
                .await
                .map_err(classify)?,
        }
        Ok(ids.len())
    }

    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> ApiResult<()> {
        self.http
            .create_reaction(
                ChannelId::new(channel_id),
                MessageId::new(message_id),
                &ReactionType::Unicode(emoji.to_string()),
            )
            .await
            .map_err(classify)
    }

    async fn guild(&self, guild_id: u64) -> ApiResult<DiscordGuild> {
        let guild = GuildId::new(guild_id)
            .to_partial_guild_with_counts(&*self.http)
            .await
            .map_err(classify)?;
        Ok(convert_guild(&guild))
    }

    async fn has_permission(
        &self,
        guild_id: u64,
        user_id: u64,
        permission: Permission,
    ) -> ApiResult<bool> {
        let guild = GuildId::new(guild_id)
            .to_partial_guild(&*self.http)
            .await
            .map_err(classify)?;
        if guild.owner_id.get() == user_id {
            return Ok(true);
        }
        let member = guild
            .id
            .member(&*self.http, UserId::new(user_id))
            .await
            .map_err(classify)?;
        let member_roles: Vec<u64> = member.roles.iter().map(|r| r.get()).collect();
        let bits = granted_bits(
            guild_id,
            &member_roles,
            guild
                .roles
                .values()
                .map(|role| (role.id.get(), role.permissions.bits())),
        );
        Ok(permission.is_granted_by(bits))
    }

    async fn kick_member(&self, guild_id: u64, user_id: u64) -> ApiResult<()> {
        GuildId::new(guild_id)
            .kick(&*self.http, UserId::new(user_id))
            .await
            .map_err(classify)
    }

    async fn ban_member(&self, guild_id: u64, user_id: u64) -> ApiResult<()> {
        GuildId::new(guild_id)
            .ban(&*self.http, UserId::new(user_id), 0)
            .await
            .map_err(classify)
    }

    async fn roles(&self, guild_id: u64) -> ApiResult<Vec<DiscordRole>> {
        let roles = GuildId::new(guild_id)
            .roles(&*self.http)
            .await
            .map_err(classify)?;
        let mut roles: Vec<DiscordRole> = roles.values().map(convert_role).collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }

    async fn add_member_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> ApiResult<()> {
        self.http
            .add_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                None,
            )
            .await
            .map_err(classify)
    }

    async fn remove_member_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> ApiResult<()> {
        self.http
            .remove_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                None,
            )
            .await
            .map_err(classify)
    }

    async fn set_everyone_can_send(
        &self,
        guild_id: u64,
        channel_id: u64,
        allowed: bool,
    ) -> ApiResult<()> {
        // The @everyone role shares the guild's ID.
        let everyone = RoleId::new(guild_id);
        let channel = ChannelId::new(channel_id);
        let existing = channel
            .to_channel(&*self.http)
            .await
            .map_err(classify)?
            .guild()
            .and_then(|c| {
                c.permission_overwrites.into_iter().find(
                    |o| matches!(o.kind, PermissionOverwriteType::Role(id) if id == everyone),
                )
            })
            .map(|o| (o.allow, o.deny));
        let (allow, deny) = send_messages_overwrite(existing, allowed);
        channel
            .create_permission(
                &*self.http,
                PermissionOverwrite {
                    allow,
                    deny,
                    kind: PermissionOverwriteType::Role(everyone),
                },
            )
            .await
            .map_err(classify)
    }

    async fn set_slowmode(&self, channel_id: u64, seconds: u16) -> ApiResult<()> {
        ChannelId::new(channel_id)
            .edit(&*self.http, EditChannel::new().rate_limit_per_user(seconds))
            .await
            .map_err(classify)?;
        Ok(())
    }
}
