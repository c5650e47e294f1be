//! Serenity event handler implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use discord_commands::Dispatcher;
use serenity::async_trait;
use serenity::gateway::ActivityData;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info};

use crate::api::SerenityApi;
use crate::convert::{convert_message, convert_user};
use crate::health::AppState;
use crate::launch::LaunchSequence;

/// Client data key for the shared dispatcher
pub struct DispatcherKey;

impl TypeMapKey for DispatcherKey {
    type Value = Arc<Dispatcher>;
}

/// Activity text shown under the bot's name.
pub fn presence_text(prefix: &str) -> String {
    format!("for {}help", prefix)
}

pub struct Handler {
    launch_step_ms: u64,
    launched: AtomicBool,
}

impl Handler {
    pub fn new(launch_step_ms: u64) -> Self {
        Self {
            launch_step_ms,
            launched: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let me = convert_user(&ready.user);

        // A new gateway session after a reconnect fires `ready` again.
        if !self.launched.swap(true, Ordering::SeqCst) {
            LaunchSequence::new(me.username.clone(), self.launch_step_ms)
                .run()
                .await;
        }
        info!("🤖 Logged in as {}", me.tag());

        let (dispatcher, health) = {
            let data = ctx.data.read().await;
            (
                data.get::<DispatcherKey>().cloned(),
                data.get::<AppState>().cloned(),
            )
        };

        match dispatcher {
            Some(d) => ctx.set_activity(Some(ActivityData::watching(presence_text(
                &d.state().prefix,
            )))),
            None => error!("Dispatcher not found in context data"),
        }

        if let Some(health) = health {
            health.set_bot_username(me.username).await;
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let (dispatcher, health) = {
            let data = ctx.data.read().await;
            match data.get::<DispatcherKey>() {
                Some(d) => (d.clone(), data.get::<AppState>().cloned()),
                None => {
                    error!("Dispatcher not found in context data");
                    return;
                }
            }
        };

        let message = convert_message(&msg);
        let api = Arc::new(SerenityApi::new(ctx.http.clone(), ctx.cache.clone()));
        let outcome = dispatcher.dispatch(api, &message).await;

        if let Some(health) = health {
            health.record(&outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_text() {
        assert_eq!(presence_text("!"), "for !help");
        assert_eq!(presence_text("?"), "for ?help");
    }

    #[test]
    fn test_handler_starts_unlaunched() {
        let handler = Handler::new(0);
        assert!(!handler.launched.load(Ordering::SeqCst));
        assert!(!handler.launched.swap(true, Ordering::SeqCst));
        assert!(handler.launched.load(Ordering::SeqCst));
    }
}
