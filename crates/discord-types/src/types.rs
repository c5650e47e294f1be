//! Core Discord domain types

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01).
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Creation time encoded in a Discord snowflake ID.
pub fn snowflake_created_at(id: u64) -> DateTime<Utc> {
    let ms = (id >> 22) as i64 + DISCORD_EPOCH_MS;
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or_default()
}

/// Date in the `Mon Jan 01 2024` form used by info embeds.
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%a %b %d %Y").to_string()
}

/// Discord user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscordUser {
    pub id: u64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    /// Legacy four-digit discriminator; `None` for migrated usernames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<u16>,
    pub bot: bool,
    /// Avatar URL, falling back to the default avatar
    pub avatar_url: String,
}

impl DiscordUser {
    /// `<@id>` mention markup
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// `name#1234` for legacy accounts, plain `name` otherwise
    pub fn tag(&self) -> String {
        match self.discriminator {
            Some(d) => format!("{}#{:04}", self.username, d),
            None => self.username.clone(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        snowflake_created_at(self.id)
    }

    /// Avatar URL pinned to a square pixel size
    pub fn avatar_url_sized(&self, size: u16) -> String {
        let base = self
            .avatar_url
            .split_once('?')
            .map_or(self.avatar_url.as_str(), |(b, _)| b);
        format!("{}?size={}", base, size)
    }
}

/// Discord guild (server)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscordGuild {
    pub id: u64,
    pub name: String,
    pub owner_id: u64,
    /// Approximate member count as reported by the REST API
    #[serde(default)]
    pub member_count: u64,
}

impl DiscordGuild {
    pub fn created_at(&self) -> DateTime<Utc> {
        snowflake_created_at(self.id)
    }
}

/// Discord role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscordRole {
    pub id: u64,
    pub name: String,
}

/// Embed field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Message embed
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
}

impl Embed {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }
}

/// Discord message, as seen by command handlers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscordMessage {
    pub id: u64,
    pub channel_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<u64>,
    pub author: DiscordUser,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Users mentioned in the message, in mention order
    #[serde(default)]
    pub mentions: Vec<DiscordUser>,
}

impl DiscordMessage {
    /// First mentioned user, if any
    pub fn first_mention(&self) -> Option<&DiscordUser> {
        self.mentions.first()
    }
}

/// Bot-wide counters read from the gateway cache
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BotStats {
    pub guilds: usize,
    pub users: usize,
}
