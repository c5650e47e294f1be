//! Serenity model → `discord-types` conversion

use chrono::{DateTime, Utc};
use discord_types::{DiscordGuild, DiscordMessage, DiscordRole, DiscordUser};
use serenity::model::channel::Message as SerenityMessage;
use serenity::model::guild::{PartialGuild, Role};
use serenity::model::user::User as SerenityUser;
use serenity::model::Timestamp;

pub fn convert_user(user: &SerenityUser) -> DiscordUser {
    DiscordUser {
        id: user.id.get(),
        username: user.name.clone(),
        global_name: user.global_name.as_deref().map(String::from),
        discriminator: user.discriminator.map(|d| d.get()),
        bot: user.bot,
        avatar_url: user.face(),
    }
}

/// With the `chrono` feature a serenity `Timestamp` wraps a `DateTime<Utc>`.
pub fn convert_timestamp(ts: &Timestamp) -> DateTime<Utc> {
    **ts
}

pub fn convert_message(msg: &SerenityMessage) -> DiscordMessage {
    DiscordMessage {
        id: msg.id.get(),
        channel_id: msg.channel_id.get(),
        guild_id: msg.guild_id.map(|g| g.get()),
        author: convert_user(&msg.author),
        content: msg.content.clone(),
        timestamp: convert_timestamp(&msg.timestamp),
        mentions: msg.mentions.iter().map(convert_user).collect(),
    }
}

pub fn convert_guild(guild: &PartialGuild) -> DiscordGuild {
    DiscordGuild {
        id: guild.id.get(),
        name: guild.name.clone(),
        owner_id: guild.owner_id.get(),
        member_count: guild.approximate_member_count.unwrap_or(0),
    }
}

pub fn convert_role(role: &Role) -> DiscordRole {
    DiscordRole {
        id: role.id.get(),
        name: role.name.clone(),
    }
}
