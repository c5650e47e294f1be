//! One-shot reminders, delivered as a reply to the invoking message

use async_trait::async_trait;
use discord_types::OutgoingMessage;
use tokio::time::Duration;
use tracing::{debug, warn};

use super::leading_int;
use crate::context::CommandContext;
use crate::error::{CommandError, CommandResult};
use crate::registry::Command;

pub struct Remind;

#[async_trait]
impl Command for Remind {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> CommandResult {
        let secs = args
            .first()
            .and_then(|a| leading_int(a))
            .filter(|s| *s >= 0)
            .ok_or_else(|| {
                CommandError::rejected(format!(
                    "Please provide a delay in seconds, e.g. {}remind 10 stretch",
                    ctx.state.prefix
                ))
            })? as u64;
        let text = args[1..].join(" ");

        ctx.reply(format!("⏰ Reminder set for {}s", secs)).await?;

        let api = ctx.api.clone();
        let original = ctx.message.clone();
        ctx.state
            .deferred
            .schedule(Duration::from_secs(secs), async move {
                debug!("Delivering reminder for message {}", original.id);
                let reminder = OutgoingMessage::text(format!("🔔 Reminder: {}", text));
                if let Err(e) = api.reply(&original, reminder).await {
                    warn!("Failed to deliver reminder for {}: {}", original.id, e);
                }
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Duration;

    use crate::dispatcher::Outcome;
    use crate::mock::{Call, MockDiscord};
    use crate::testing::{Harness, MESSAGE_ID};

    #[tokio::test(start_paused = true)]
    async fn test_reminder_fires_once_after_delay() {
        let h = Harness::new(MockDiscord::new());
        h.run("!remind 5 stretch your legs").await;
        assert_eq!(h.mock.replies(), vec!["⏰ Reminder set for 5s"]);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(h.mock.replies().len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            h.mock.replies(),
            vec!["⏰ Reminder set for 5s", "🔔 Reminder: stretch your legs"]
        );
        assert!(matches!(
            h.mock.calls().last(),
            Some(Call::Reply { to_message_id, .. }) if *to_message_id == MESSAGE_ID
        ));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(h.mock.replies().len(), 2);
        assert_eq!(h.dispatcher.state().deferred.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminders_are_independent() {
        let h = Harness::new(MockDiscord::new());
        h.run("!remind 10 second").await;
        h.run("!remind 2 first").await;
        assert_eq!(h.dispatcher.state().deferred.pending(), 2);

        tokio::time::sleep(Duration::from_secs(11)).await;
        let replies = h.mock.replies();
        assert_eq!(replies[2], "🔔 Reminder: first");
        assert_eq!(replies[3], "🔔 Reminder: second");
    }

    #[tokio::test]
    async fn test_non_numeric_delay_is_rejected() {
        let h = Harness::new(MockDiscord::new());
        let outcome = h.run("!remind soon do things").await;
        assert!(matches!(outcome, Outcome::Failed { ref error, .. } if error.is_rejection()));
        assert_eq!(
            h.mock.replies(),
            vec!["Please provide a delay in seconds, e.g. !remind 10 stretch"]
        );
        assert_eq!(h.dispatcher.state().deferred.pending(), 0);
    }

    #[tokio::test]
    async fn test_missing_delay_is_rejected() {
        let h = Harness::new(MockDiscord::new());
        h.run("!remind").await;
        assert_eq!(h.mock.replies().len(), 1);
        assert_eq!(h.dispatcher.state().deferred.pending(), 0);
    }
}
