//! Chat toys: echo, dice, coin, 8-ball, hugs and slaps

use async_trait::async_trait;
use rand::Rng;
use tracing::warn;

use crate::context::CommandContext;
use crate::error::CommandResult;
use crate::registry::Command;

pub const EIGHT_BALL_ANSWERS: [&str; 4] = ["Yes", "No", "Maybe", "Ask again later"];

/// Uniform integer in `1..=6`.
pub fn roll_die<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=6)
}

pub fn flip_coin<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    if rng.gen_bool(0.5) {
        "Heads"
    } else {
        "Tails"
    }
}

pub fn shake_eight_ball<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    EIGHT_BALL_ANSWERS[rng.gen_range(0..EIGHT_BALL_ANSWERS.len())]
}

/// Reposts the arguments as the bot and removes the invoking message.
pub struct Say;

#[async_trait]
impl Command for Say {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> CommandResult {
        if args.is_empty() {
            ctx.reply("Please provide text to say.").await?;
            return Ok(());
        }
        let msg = ctx.message;
        if let Err(e) = ctx.api.delete_message(msg.channel_id, msg.id).await {
            warn!("Could not delete say invocation {}: {}", msg.id, e);
        }
        ctx.send(args.join(" ")).await?;
        Ok(())
    }
}

/// Placeholder: echoes the text back.
pub struct Translate;

#[async_trait]
impl Command for Translate {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> CommandResult {
        ctx.reply(format!("Translated: {}", args.join(" "))).await?;
        Ok(())
    }
}

pub struct Roll;

#[async_trait]
impl Command for Roll {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let n = roll_die(&mut rand::thread_rng());
        ctx.reply(format!("🎲 You rolled a {}", n)).await?;
        Ok(())
    }
}

pub struct Flip;

#[async_trait]
impl Command for Flip {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let side = flip_coin(&mut rand::thread_rng());
        ctx.reply(format!("🪙 {}", side)).await?;
        Ok(())
    }
}

pub struct EightBall;

#[async_trait]
impl Command for EightBall {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let answer = shake_eight_ball(&mut rand::thread_rng());
        ctx.reply(format!("🔮 {}", answer)).await?;
        Ok(())
    }
}

pub struct Hug;

#[async_trait]
impl Command for Hug {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let author = &ctx.message.author;
        let target = ctx.message.first_mention().unwrap_or(author);
        ctx.reply(format!("🤗 {} hugs {}", author.mention(), target.mention()))
            .await?;
        Ok(())
    }
}

pub struct Slap;

#[async_trait]
impl Command for Slap {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let target = ctx
            .message
            .first_mention()
            .map_or_else(|| "the air".to_string(), |u| u.mention());
        ctx.reply(format!(
            "👋 {} slaps {}!",
            ctx.message.author.mention(),
            target
        ))
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use discord_types::DiscordErrorCode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::mock::{Call, MockDiscord};
    use crate::testing::{Harness, CHANNEL_ID, MESSAGE_ID};

    #[test]
    fn test_roll_die_stays_in_range_and_covers_all_faces() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<u8, u32> = HashMap::new();
        for _ in 0..6_000 {
            let n = roll_die(&mut rng);
            assert!((1..=6).contains(&n), "rolled {}", n);
            *counts.entry(n).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        // Each face expects 1000 hits; allow generous slack.
        for (face, count) in counts {
            assert!((800..=1200).contains(&count), "face {} hit {} times", face, count);
        }
    }

    #[test]
    fn test_flip_coin_hits_both_sides() {
        let mut rng = StdRng::seed_from_u64(11);
        let heads = (0..1_000).filter(|_| flip_coin(&mut rng) == "Heads").count();
        assert!((400..=600).contains(&heads), "{} heads", heads);
    }

    #[test]
    fn test_eight_ball_only_known_answers() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(EIGHT_BALL_ANSWERS.contains(&shake_eight_ball(&mut rng)));
        }
    }

    #[tokio::test]
    async fn test_roll_reply_format() {
        let h = Harness::new(MockDiscord::new());
        for _ in 0..20 {
            h.run("!roll").await;
        }
        for reply in h.mock.replies() {
            let n: u8 = reply
                .strip_prefix("🎲 You rolled a ")
                .and_then(|n| n.parse().ok())
                .unwrap_or_else(|| panic!("bad reply {:?}", reply));
            assert!((1..=6).contains(&n));
        }
    }

    #[tokio::test]
    async fn test_flip_reply_is_heads_or_tails() {
        let h = Harness::new(MockDiscord::new());
        h.run("!flip").await;
        let reply = &h.mock.replies()[0];
        assert!(reply == "🪙 Heads" || reply == "🪙 Tails", "{}", reply);
    }

    #[tokio::test]
    async fn test_eight_ball_reply() {
        let h = Harness::new(MockDiscord::new());
        h.run("!8ball will it compile?").await;
        let reply = &h.mock.replies()[0];
        let answer = reply.strip_prefix("🔮 ").unwrap();
        assert!(EIGHT_BALL_ANSWERS.contains(&answer));
    }

    #[tokio::test]
    async fn test_say_without_text_asks_for_some() {
        let h = Harness::new(MockDiscord::new());
        h.run("!say").await;
        assert_eq!(h.mock.replies(), vec!["Please provide text to say."]);
        assert_eq!(h.mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_say_deletes_invocation_and_posts_text() {
        let h = Harness::new(MockDiscord::new());
        h.run("!say hello   there").await;

        let calls = h.mock.calls();
        assert_eq!(
            calls[0],
            Call::DeleteMessage {
                channel_id: CHANNEL_ID,
                message_id: MESSAGE_ID
            }
        );
        assert!(matches!(
            &calls[1],
            Call::SendMessage { channel_id, message }
                if *channel_id == CHANNEL_ID && message.content == "hello there"
        ));
    }

    #[tokio::test]
    async fn test_say_still_posts_when_delete_fails() {
        let h = Harness::new(
            MockDiscord::new().fail("delete_message", DiscordErrorCode::MissingPermissions),
        );
        h.run("!say hi").await;
        assert_eq!(h.mock.outgoing().len(), 1);
        assert_eq!(h.mock.outgoing()[0].content, "hi");
    }

    #[tokio::test]
    async fn test_translate_echoes() {
        let h = Harness::new(MockDiscord::new());
        h.run("!translate bonjour le monde").await;
        assert_eq!(h.mock.replies(), vec!["Translated: bonjour le monde"]);
    }

    #[tokio::test]
    async fn test_hug_self_and_target() {
        let h = Harness::new(MockDiscord::new());
        h.run("!hug").await;
        h.run("!hug <@101>").await;
        assert_eq!(
            h.mock.replies(),
            vec!["🤗 <@100> hugs <@100>", "🤗 <@100> hugs <@101>"]
        );
    }

    #[tokio::test]
    async fn test_slap_target_or_air() {
        let h = Harness::new(MockDiscord::new());
        h.run("!slap <@101>").await;
        h.run("!slap").await;
        assert_eq!(
            h.mock.replies(),
            vec!["👋 <@100> slaps <@101>!", "👋 <@100> slaps the air!"]
        );
    }
}
