//! Fixtures shared by the unit tests of this crate.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use discord_types::{DiscordMessage, DiscordUser};

use crate::context::BotState;
use crate::dispatcher::{Dispatcher, Outcome};
use crate::mock::MockDiscord;
use crate::registry::CommandRegistry;
use crate::web::{WebApiConfig, WebApis};

pub const AUTHOR_ID: u64 = 100;
pub const TARGET_ID: u64 = 101;
pub const CHANNEL_ID: u64 = 200;
pub const GUILD_ID: u64 = 300;
pub const MESSAGE_ID: u64 = 400;

pub fn user(id: u64, username: &str) -> DiscordUser {
    DiscordUser {
        id,
        username: username.to_string(),
        global_name: None,
        discriminator: None,
        bot: false,
        avatar_url: format!("https://cdn.discordapp.com/avatars/{}/hash.png", id),
    }
}

/// Guild message from `alice`, mentioning `bob` if the content contains `<@101>`.
pub fn guild_message(content: &str) -> DiscordMessage {
    let mentions = if content.contains(&format!("<@{}>", TARGET_ID)) {
        vec![user(TARGET_ID, "bob")]
    } else {
        Vec::new()
    };
    DiscordMessage {
        id: MESSAGE_ID,
        channel_id: CHANNEL_ID,
        guild_id: Some(GUILD_ID),
        author: user(AUTHOR_ID, "alice"),
        content: content.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        mentions,
    }
}

pub fn state_with(web: WebApiConfig) -> BotState {
    BotState::new("!", WebApis::new(web).expect("web client"))
}

/// Builtin registry wired to a mock, dispatching with prefix `!`.
pub struct Harness {
    pub mock: MockDiscord,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub fn new(mock: MockDiscord) -> Self {
        Self::with_web(mock, WebApiConfig::default())
    }

    pub fn with_web(mock: MockDiscord, web: WebApiConfig) -> Self {
        Self::with_registry(mock, CommandRegistry::builtin(), web)
    }

    pub fn with_registry(mock: MockDiscord, registry: CommandRegistry, web: WebApiConfig) -> Self {
        Self {
            mock,
            dispatcher: Dispatcher::new(Arc::new(registry), Arc::new(state_with(web))),
        }
    }

    /// Dispatch a guild message from `alice` with the given content.
    pub async fn run(&self, content: &str) -> Outcome {
        self.send(&guild_message(content)).await
    }

    pub async fn send(&self, message: &DiscordMessage) -> Outcome {
        self.dispatcher
            .dispatch(Arc::new(self.mock.clone()), message)
            .await
    }
}
