//! Moderation commands.
//!
//! Every command here checks the invoking member's permission before doing
//! anything else. Member-targeting commands act on the first mention.

use async_trait::async_trait;
use discord_types::Permission;
use tokio::time::Duration;
use tracing::{info, warn};

use super::{leading_int, mentioned_member};
use crate::context::CommandContext;
use crate::error::{CommandError, CommandResult, RejectOnFailure};
use crate::registry::Command;

/// Name of the role `mute` and `unmute` toggle.
pub const MUTED_ROLE: &str = "Muted";

pub const DEFAULT_CLEAR_COUNT: i64 = 5;
/// Bulk delete accepts at most 100 messages, and the invocation counts as one.
pub const MAX_CLEAR_COUNT: i64 = 99;
/// How long the `clear` confirmation stays up.
pub const CLEAR_CONFIRMATION_TTL: Duration = Duration::from_secs(5);

/// Discord's upper bound for a channel rate limit.
pub const MAX_SLOWMODE_SECS: u16 = 21_600;

/// Number of messages `clear` removes, not counting the invocation.
pub fn clear_count(arg: Option<&str>) -> i64 {
    match arg.and_then(leading_int) {
        None | Some(0) => DEFAULT_CLEAR_COUNT,
        Some(n) => n.clamp(1, MAX_CLEAR_COUNT),
    }
}

pub fn parse_slowmode(arg: Option<&str>) -> Option<u16> {
    arg.and_then(leading_int)
        .filter(|s| (0..=i64::from(MAX_SLOWMODE_SECS)).contains(s))
        .map(|s| s as u16)
}

pub struct Kick;

#[async_trait]
impl Command for Kick {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        ctx.require_permission(Permission::KickMembers).await?;
        let member = mentioned_member(ctx)?;
        ctx.api
            .kick_member(ctx.guild_id()?, member.id)
            .await
            .or_reject("Failed to kick.")?;
        info!("User {} kicked {}", ctx.message.author.id, member.id);
        ctx.reply(format!("👢 Kicked {}", member.mention())).await?;
        Ok(())
    }
}

pub struct Ban;

#[async_trait]
impl Command for Ban {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        ctx.require_permission(Permission::BanMembers).await?;
        let member = mentioned_member(ctx)?;
        ctx.api
            .ban_member(ctx.guild_id()?, member.id)
            .await
            .or_reject("Failed to ban.")?;
        info!("User {} banned {}", ctx.message.author.id, member.id);
        ctx.reply(format!("🔨 Banned {}", member.mention())).await?;
        Ok(())
    }
}

async fn muted_role_id(ctx: &CommandContext<'_>, guild_id: u64) -> CommandResult<u64> {
    ctx.api
        .roles(guild_id)
        .await?
        .into_iter()
        .find(|r| r.name == MUTED_ROLE)
        .map(|r| r.id)
        .ok_or_else(|| {
            CommandError::rejected(format!(
                "No role named \"{}\" exists in this server.",
                MUTED_ROLE
            ))
        })
}

pub struct Mute;

#[async_trait]
impl Command for Mute {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        ctx.require_permission(Permission::ManageRoles).await?;
        let member = mentioned_member(ctx)?;
        let guild_id = ctx.guild_id()?;
        let role_id = muted_role_id(ctx, guild_id).await?;
        ctx.api
            .add_member_role(guild_id, member.id, role_id)
            .await
            .or_reject("Failed to mute.")?;
        ctx.reply(format!("🔇 Muted {}", member.mention())).await?;
        Ok(())
    }
}

pub struct Unmute;

#[async_trait]
impl Command for Unmute {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        ctx.require_permission(Permission::ManageRoles).await?;
        let member = mentioned_member(ctx)?;
        let guild_id = ctx.guild_id()?;
        let role_id = muted_role_id(ctx, guild_id).await?;
        ctx.api
            .remove_member_role(guild_id, member.id, role_id)
            .await
            .or_reject("Failed to unmute.")?;
        ctx.reply(format!("🔈 Unmuted {}", member.mention())).await?;
        Ok(())
    }
}

/// Public warning only; nothing is recorded.
pub struct Warn;

#[async_trait]
impl Command for Warn {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        ctx.require_permission(Permission::ModerateMembers).await?;
        let member = mentioned_member(ctx)?;
        ctx.reply(format!("⚠️ {}, you have been warned.", member.mention()))
            .await?;
        Ok(())
    }
}

/// Bulk-deletes recent messages plus the invocation, then posts a
/// confirmation that removes itself.
pub struct Clear;

#[async_trait]
impl Command for Clear {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> CommandResult {
        ctx.require_permission(Permission::ManageMessages).await?;
        let count = clear_count(args.first().map(String::as_str));
        let channel_id = ctx.message.channel_id;
        ctx.api
            .bulk_delete(channel_id, (count + 1) as u8)
            .await
            .or_reject("Failed to delete.")?;

        let confirmation = ctx
            .reply(format!("🧹 Deleted {} messages.", count))
            .await?;
        let api = ctx.api.clone();
        ctx.state
            .deferred
            .schedule(CLEAR_CONFIRMATION_TTL, async move {
                if let Err(e) = api.delete_message(channel_id, confirmation.id).await {
                    warn!(
                        "Failed to remove clear confirmation {}: {}",
                        confirmation.id, e
                    );
                }
            });
        Ok(())
    }
}

async fn set_send_messages(ctx: &CommandContext<'_>, allowed: bool) -> CommandResult {
    ctx.require_permission(Permission::ManageChannels).await?;
    ctx.api
        .set_everyone_can_send(ctx.guild_id()?, ctx.message.channel_id, allowed)
        .await?;
    Ok(())
}

pub struct Lockdown;

#[async_trait]
impl Command for Lockdown {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        set_send_messages(ctx, false).await?;
        ctx.reply("🔒 Channel locked.").await?;
        Ok(())
    }
}

pub struct Unlock;

#[async_trait]
impl Command for Unlock {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        set_send_messages(ctx, true).await?;
        ctx.reply("🔓 Channel unlocked.").await?;
        Ok(())
    }
}

pub struct Slowmode;

#[async_trait]
impl Command for Slowmode {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> CommandResult {
        ctx.require_permission(Permission::ManageChannels).await?;
        let seconds = parse_slowmode(args.first().map(String::as_str)).ok_or_else(|| {
            CommandError::rejected(format!(
                "Please provide a slowmode between 0 and {} seconds.",
                MAX_SLOWMODE_SECS
            ))
        })?;
        ctx.api
            .set_slowmode(ctx.message.channel_id, seconds)
            .await
            .or_reject("Failed.")?;
        ctx.reply(format!("🐌 Slowmode: {}s", seconds)).await?;
        Ok(())
    }
}
