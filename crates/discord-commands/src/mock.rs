//! In-memory `DiscordApi` that records every call, for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use discord_types::{
    BotStats, DiscordErrorCode, DiscordGuild, DiscordMessage, DiscordRole, DiscordUser,
    OutgoingMessage, Permission,
};

use crate::api::{ApiResult, DiscordApi};
use crate::error::ApiError;

/// Simulated round-trip added to the timestamp of every reply.
pub const MOCK_LATENCY_MS: i64 = 42;

/// User ID of the mock bot account.
pub const MOCK_BOT_ID: u64 = 9_000;

/// A recorded `DiscordApi` call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SendMessage {
        channel_id: u64,
        message: OutgoingMessage,
    },
    Reply {
        channel_id: u64,
        to_message_id: u64,
        message: OutgoingMessage,
    },
    EditMessage {
        channel_id: u64,
        message_id: u64,
        content: String,
    },
    DeleteMessage {
        channel_id: u64,
        message_id: u64,
    },
    BulkDelete {
        channel_id: u64,
        count: u8,
    },
    AddReaction {
        channel_id: u64,
        message_id: u64,
        emoji: String,
    },
    Kick {
        guild_id: u64,
        user_id: u64,
    },
    Ban {
        guild_id: u64,
        user_id: u64,
    },
    AddRole {
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    },
    RemoveRole {
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    },
    SetEveryoneCanSend {
        guild_id: u64,
        channel_id: u64,
        allowed: bool,
    },
    SetSlowmode {
        channel_id: u64,
        seconds: u16,
    },
}

struct MockState {
    calls: Vec<Call>,
    bot_user: DiscordUser,
    guild: DiscordGuild,
    roles: Vec<DiscordRole>,
    permissions: HashMap<u64, u64>,
    failing: HashMap<&'static str, DiscordErrorCode>,
    panicking: HashSet<&'static str>,
    stats: BotStats,
    next_message_id: u64,
}

/// Recording `DiscordApi` double.
///
/// Mutating operations push a [`Call`]; queries answer from configured
/// state. Any operation can be made to fail with [`MockDiscord::fail`].
#[derive(Clone)]
pub struct MockDiscord {
    inner: Arc<Mutex<MockState>>,
}

impl MockDiscord {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                calls: Vec::new(),
                bot_user: DiscordUser {
                    id: MOCK_BOT_ID,
                    username: "testbot".to_string(),
                    global_name: None,
                    discriminator: Some(1),
                    bot: true,
                    avatar_url: "https://cdn.discordapp.com/embed/avatars/0.png".to_string(),
                },
                guild: DiscordGuild {
                    id: 0,
                    name: "Test Guild".to_string(),
                    owner_id: 0,
                    member_count: 0,
                },
                roles: Vec::new(),
                permissions: HashMap::new(),
                failing: HashMap::new(),
                panicking: HashSet::new(),
                stats: BotStats::default(),
                next_message_id: 10_000,
            })),
        }
    }

    /// Guild returned by `guild()`, whatever ID is asked for.
    pub fn with_guild(self, guild: DiscordGuild) -> Self {
        self.inner.lock().unwrap().guild = guild;
        self
    }

    pub fn with_role(self, id: u64, name: &str) -> Self {
        self.inner.lock().unwrap().roles.push(DiscordRole {
            id,
            name: name.to_string(),
        });
        self
    }

    /// Grant permissions to a user.
    pub fn with_permissions(self, user_id: u64, permissions: &[Permission]) -> Self {
        let bits = permissions.iter().fold(0, |acc, p| acc | p.bits());
        *self
            .inner
            .lock()
            .unwrap()
            .permissions
            .entry(user_id)
            .or_default() |= bits;
        self
    }

    pub fn with_stats(self, stats: BotStats) -> Self {
        self.inner.lock().unwrap().stats = stats;
        self
    }

    /// Make the named operation (e.g. `"bulk_delete"`) fail with `code`.
    pub fn fail(self, operation: &'static str, code: DiscordErrorCode) -> Self {
        self.inner.lock().unwrap().failing.insert(operation, code);
        self
    }

    /// Make the named operation panic.
    pub fn panic_on(self, operation: &'static str) -> Self {
        self.inner.lock().unwrap().panicking.insert(operation);
        self
    }

    /// Snapshot of all recorded calls, in call order.
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Text of every reply, in order.
    pub fn replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reply { message, .. } => Some(message.content),
                _ => None,
            })
            .collect()
    }

    /// Every message sent through `reply` or `send_message`.
    pub fn outgoing(&self) -> Vec<OutgoingMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reply { message, .. } | Call::SendMessage { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    fn check(&self, operation: &'static str) -> ApiResult<()> {
        let state = self.inner.lock().unwrap();
        if state.panicking.contains(operation) {
            drop(state);
            panic!("mock panic in {}", operation);
        }
        match state.failing.get(operation) {
            Some(code) => Err(ApiError::Discord {
                code: *code,
                status: 400,
                message: format!("mock failure in {}", operation),
            }),
            None => Ok(()),
        }
    }

    fn record(&self, call: Call) {
        self.inner.lock().unwrap().calls.push(call);
    }

    fn bot_message(
        &self,
        channel_id: u64,
        message: &OutgoingMessage,
        ts: chrono::DateTime<Utc>,
    ) -> DiscordMessage {
        let mut state = self.inner.lock().unwrap();
        state.next_message_id += 1;
        DiscordMessage {
            id: state.next_message_id,
            channel_id,
            guild_id: None,
            author: state.bot_user.clone(),
            content: message.content.clone(),
            timestamp: ts,
            mentions: Vec::new(),
        }
    }
}

impl Default for MockDiscord {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiscordApi for MockDiscord {
    async fn current_user(&self) -> ApiResult<DiscordUser> {
        self.check("current_user")?;
        Ok(self.inner.lock().unwrap().bot_user.clone())
    }

    fn stats(&self) -> BotStats {
        self.inner.lock().unwrap().stats
    }

    async fn send_message(
        &self,
        channel_id: u64,
        message: OutgoingMessage,
    ) -> ApiResult<DiscordMessage> {
        self.check("send_message")?;
        let sent = self.bot_message(channel_id, &message, Utc::now());
        self.record(Call::SendMessage {
            channel_id,
            message,
        });
        Ok(sent)
    }

    async fn reply(
        &self,
        to: &DiscordMessage,
        message: OutgoingMessage,
    ) -> ApiResult<DiscordMessage> {
        self.check("reply")?;
        let ts = to.timestamp + Duration::milliseconds(MOCK_LATENCY_MS);
        let sent = self.bot_message(to.channel_id, &message, ts);
        self.record(Call::Reply {
            channel_id: to.channel_id,
            to_message_id: to.id,
            message,
        });
        Ok(sent)
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> ApiResult<()> {
        self.check("edit_message")?;
        self.record(Call::EditMessage {
            channel_id,
            message_id,
            content: content.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> ApiResult<()> {
        self.check("delete_message")?;
        self.record(Call::DeleteMessage {
            channel_id,
            message_id,
        });
        Ok(())
    }

    async fn bulk_delete(&self, channel_id: u64, count: u8) -> ApiResult<usize> {
        self.check("bulk_delete")?;
        self.record(Call::BulkDelete { channel_id, count });
        Ok(count as usize)
    }

    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> ApiResult<()> {
        self.check("add_reaction")?;
        self.record(Call::AddReaction {
            channel_id,
            message_id,
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn guild(&self, guild_id: u64) -> ApiResult<DiscordGuild> {
        self.check("guild")?;
        let mut guild = self.inner.lock().unwrap().guild.clone();
        guild.id = guild_id;
        Ok(guild)
    }

    async fn has_permission(
        &self,
        _guild_id: u64,
        user_id: u64,
        permission: Permission,
    ) -> ApiResult<bool> {
        self.check("has_permission")?;
        let state = self.inner.lock().unwrap();
        if state.guild.owner_id == user_id {
            return Ok(true);
        }
        let granted = state.permissions.get(&user_id).copied().unwrap_or(0);
        Ok(permission.is_granted_by(granted))
    }

    async fn kick_member(&self, guild_id: u64, user_id: u64) -> ApiResult<()> {
        self.check("kick_member")?;
        self.record(Call::Kick { guild_id, user_id });
        Ok(())
    }

    async fn ban_member(&self, guild_id: u64, user_id: u64) -> ApiResult<()> {
        self.check("ban_member")?;
        self.record(Call::Ban { guild_id, user_id });
        Ok(())
    }

    async fn roles(&self, _guild_id: u64) -> ApiResult<Vec<DiscordRole>> {
        self.check("roles")?;
        Ok(self.inner.lock().unwrap().roles.clone())
    }

    async fn add_member_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> ApiResult<()> {
        self.check("add_member_role")?;
        self.record(Call::AddRole {
            guild_id,
            user_id,
            role_id,
        });
        Ok(())
    }

    async fn remove_member_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> ApiResult<()> {
        self.check("remove_member_role")?;
        self.record(Call::RemoveRole {
            guild_id,
            user_id,
            role_id,
        });
        Ok(())
    }

    async fn set_everyone_can_send(
        &self,
        guild_id: u64,
        channel_id: u64,
        allowed: bool,
    ) -> ApiResult<()> {
        self.check("set_everyone_can_send")?;
        self.record(Call::SetEveryoneCanSend {
            guild_id,
            channel_id,
            allowed,
        });
        Ok(())
    }

    async fn set_slowmode(&self, channel_id: u64, seconds: u16) -> ApiResult<()> {
        self.check("set_slowmode")?;
        self.record(Call::SetSlowmode {
            channel_id,
            seconds,
        });
        Ok(())
    }
}
