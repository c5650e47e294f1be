//! Informational commands: latency, users, guild, help, bot metadata

use async_trait::async_trait;
use discord_types::{format_date, Embed};

use crate::context::CommandContext;
use crate::error::CommandResult;
use crate::registry::Command;

/// Replies, then edits the reply with the round-trip between the two
/// message timestamps.
pub struct Ping;

#[async_trait]
impl Command for Ping {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let sent = ctx.reply("Pinging...").await?;
        let latency = (sent.timestamp - ctx.message.timestamp).num_milliseconds();
        ctx.api
            .edit_message(
                sent.channel_id,
                sent.id,
                &format!("Pong! Latency is {}ms", latency),
            )
            .await?;
        Ok(())
    }
}

pub struct Avatar;

#[async_trait]
impl Command for Avatar {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let user = ctx.message.first_mention().unwrap_or(&ctx.message.author);
        ctx.reply(user.avatar_url_sized(512)).await?;
        Ok(())
    }
}

pub struct ServerInfo;

#[async_trait]
impl Command for ServerInfo {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let guild = ctx.api.guild(ctx.guild_id()?).await?;
        let embed = Embed::titled(&guild.name)
            .field("Members", guild.member_count.to_string(), true)
            .field("Created", format_date(guild.created_at()), true);
        ctx.reply(embed).await?;
        Ok(())
    }
}

pub struct UserInfo;

#[async_trait]
impl Command for UserInfo {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let user = ctx.message.first_mention().unwrap_or(&ctx.message.author);
        let embed = Embed::titled(user.tag())
            .thumbnail(&user.avatar_url)
            .field("ID", user.id.to_string(), true)
            .field("Joined Discord", format_date(user.created_at()), true);
        ctx.reply(embed).await?;
        Ok(())
    }
}

/// Lists every registered command in registration order.
pub struct Help;

#[async_trait]
impl Command for Help {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let prefix = &ctx.state.prefix;
        let lines: Vec<String> = ctx
            .registry
            .iter()
            .map(|d| format!("**{}{}**: {}", prefix, d.name, d.description))
            .collect();
        ctx.reply(Embed::titled("Help Menu").description(lines.join("\n")))
            .await?;
        Ok(())
    }
}

pub struct Uptime;

#[async_trait]
impl Command for Uptime {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let secs = ctx.state.started_at.elapsed().as_secs();
        ctx.reply(format!("⏱️ Uptime: {}s", secs)).await?;
        Ok(())
    }
}

pub struct Invite;

#[async_trait]
impl Command for Invite {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let bot = ctx.api.current_user().await?;
        ctx.reply(format!(
            "🔗 Invite me: https://discord.com/oauth2/authorize?client_id={}&permissions=8",
            bot.id
        ))
        .await?;
        Ok(())
    }
}

pub struct Stats;

#[async_trait]
impl Command for Stats {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let stats = ctx.api.stats();
        ctx.reply(format!(
            "📊 Servers: {} | Users: {}",
            stats.guilds, stats.users
        ))
        .await?;
        Ok(())
    }
}
