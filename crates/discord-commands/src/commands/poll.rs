//! Reaction polls

use async_trait::async_trait;
use discord_types::Embed;

use crate::context::CommandContext;
use crate::error::{CommandError, CommandResult};
use crate::registry::Command;

/// One reaction per option, in option order.
pub const OPTION_EMOJIS: [&str; 10] = [
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
    "6\u{fe0f}\u{20e3}",
    "7\u{fe0f}\u{20e3}",
    "8\u{fe0f}\u{20e3}",
    "9\u{fe0f}\u{20e3}",
    "🔟",
];

#[derive(Debug, Clone, PartialEq)]
pub struct PollForm {
    pub question: String,
    pub options: Vec<String>,
}

impl PollForm {
    /// Parse `Question | A | B ...`. Blank options are dropped.
    pub fn parse(args: &[String]) -> Option<Self> {
        let joined = args.join(" ");
        let mut parts = joined.split('|').map(str::trim);
        let question = parts.next().filter(|q| !q.is_empty())?.to_string();
        let options: Vec<String> = parts
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if options.is_empty() || options.len() > OPTION_EMOJIS.len() {
            return None;
        }
        Some(Self { question, options })
    }

    pub fn embed(&self) -> Embed {
        let lines: Vec<String> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, o)| format!("{}. {}", i + 1, o))
            .collect();
        Embed::titled(format!("Poll: {}", self.question)).description(lines.join("\n"))
    }
}

pub struct Poll;

#[async_trait]
impl Command for Poll {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> CommandResult {
        let form = PollForm::parse(args).ok_or_else(|| {
            CommandError::rejected(format!(
                "Usage: {}poll Question | Option 1 | Option 2 (1 to {} options)",
                ctx.state.prefix,
                OPTION_EMOJIS.len()
            ))
        })?;
        let poll = ctx.send(form.embed()).await?;
        for emoji in OPTION_EMOJIS.iter().take(form.options.len()) {
            ctx.api
                .add_reaction(poll.channel_id, poll.id, emoji)
                .await?;
        }
        Ok(())
    }
}
