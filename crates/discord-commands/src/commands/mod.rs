//! Built-in commands

pub mod fun;
pub mod info;
pub mod math;
pub mod media;
pub mod moderation;
pub mod poll;
pub mod remind;

use discord_types::DiscordUser;

use crate::context::CommandContext;
use crate::error::{CommandError, CommandResult};
use crate::registry::CommandRegistry;

/// Register every built-in command, in help-menu order.
pub fn register_builtin(registry: &mut CommandRegistry) {
    registry.register("ping", "Check bot latency", info::Ping);
    registry.register("avatar", "Display user avatar", info::Avatar);
    registry.register("serverinfo", "Show server information", info::ServerInfo);
    registry.register("userinfo", "Show user information", info::UserInfo);
    registry.register("say", "Make the bot say something", fun::Say);
    registry.register("help", "List all commands", info::Help);
    registry.register("roll", "Roll a 6-sided dice", fun::Roll);
    registry.register("flip", "Flip a coin", fun::Flip);
    registry.register("8ball", "Magic 8-ball", fun::EightBall);
    registry.register("joke", "Tell a joke", media::Joke);
    registry.register("meme", "Fetch a random meme", media::Meme);
    registry.register("cat", "Random cat pic", media::Cat);
    registry.register("dog", "Random dog pic", media::Dog);
    registry.register("hug", "Send a hug", fun::Hug);
    registry.register("slap", "Slap someone", fun::Slap);
    registry.register("kick", "Kick a member", moderation::Kick);
    registry.register("ban", "Ban a member", moderation::Ban);
    registry.register("mute", "Mute a member", moderation::Mute);
    registry.register("unmute", "Unmute a member", moderation::Unmute);
    registry.register("warn", "Warn a member", moderation::Warn);
    registry.register("clear", "Clear messages", moderation::Clear);
    registry.register("lockdown", "Lock the channel", moderation::Lockdown);
    registry.register("unlock", "Unlock the channel", moderation::Unlock);
    registry.register("slowmode", "Set channel slowmode", moderation::Slowmode);
    registry.register("poll", "Create a poll", poll::Poll);
    registry.register("remind", "Set a reminder", remind::Remind);
    registry.register("math", "Evaluate an arithmetic expression", math::Math);
    registry.register("translate", "Translate text", fun::Translate);
    registry.register("uptime", "Show bot uptime", info::Uptime);
    registry.register("invite", "Generate invite link", info::Invite);
    registry.register("stats", "Bot statistics", info::Stats);
}

/// Parse the leading integer of `token`, ignoring anything after it.
///
/// `"12abc"` gives 12, `"-3"` gives -3, `"abc"` and `""` give `None`.
/// Out-of-range values saturate.
pub fn leading_int(token: &str) -> Option<i64> {
    let token = token.trim_start();
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let magnitude = digits[..len].bytes().fold(0i64, |acc, d| {
        acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// The first mentioned user, or a rejection asking for one.
pub(crate) fn mentioned_member<'a>(ctx: &'a CommandContext<'_>) -> CommandResult<&'a DiscordUser> {
    ctx.message
        .first_mention()
        .ok_or_else(|| CommandError::rejected("Please mention a member."))
}
