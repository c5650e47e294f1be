//! Discord REST error classification.
//!
//! Maps the Discord JSON error codes a prefix-command bot actually runs into
//! (moderation, bulk deletes, reactions, replies) onto named variants so the
//! dispatcher can log permanent failures differently from transient ones.

use serde::{Deserialize, Serialize};

/// High-level category of a Discord API error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Rate limit hit.
    RateLimit,
    /// Target resource (channel, message, member, role) not found.
    NotFound,
    /// The bot lacks the permission or role hierarchy for the action.
    PermissionDenied,
    /// Malformed or semantically invalid input.
    InvalidInput,
    /// Network or I/O error.
    Network,
    /// Anything else.
    Unknown,
}

/// Discord-specific error code.
///
/// See <https://discord.com/developers/docs/topics/opcodes-and-status-codes#json>.
/// Codes without a named variant map to [`DiscordErrorCode::Unknown`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscordErrorCode {
    /// 10003
    UnknownChannel,
    /// 10004
    UnknownGuild,
    /// 10007: member left or was already kicked.
    UnknownMember,
    /// 10008: message was already deleted.
    UnknownMessage,
    /// 10011
    UnknownRole,
    /// 10013
    UnknownUser,
    /// 10014
    UnknownEmoji,

    /// 50001
    MissingAccess,
    /// 50013: also returned when the target outranks the bot.
    MissingPermissions,

    /// HTTP 429.
    RateLimited,
    /// 20016: slowmode blocks the bot itself.
    SlowmodeRateLimit,

    /// 50006
    CannotSendEmptyMessage,
    /// 50016: bulk delete needs 2 to 100 messages.
    InvalidMessageCount,
    /// 50034: bulk delete only accepts messages under 14 days old.
    MessageTooOldToBulkDelete,
    /// 50035
    InvalidFormBody,
    /// 30010
    MaxReactionsReached,

    /// 40001 / 50014
    InvalidToken,
    /// 130000
    ApiOverloaded,

    /// Client-side network or I/O failure.
    NetworkError,
    /// Any code not listed above.
    Unknown,
}

impl DiscordErrorCode {
    /// Derive the code from a raw Discord JSON error code integer.
    pub fn from_raw(code: u32) -> Self {
        match code {
            10003 => Self::UnknownChannel,
            10004 => Self::UnknownGuild,
            10007 => Self::UnknownMember,
            10008 => Self::UnknownMessage,
            10011 => Self::UnknownRole,
            10013 => Self::UnknownUser,
            10014 => Self::UnknownEmoji,
            20016 => Self::SlowmodeRateLimit,
            30010 => Self::MaxReactionsReached,
            40001 | 50014 => Self::InvalidToken,
            50001 => Self::MissingAccess,
            50006 => Self::CannotSendEmptyMessage,
            50013 => Self::MissingPermissions,
            50016 => Self::InvalidMessageCount,
            50034 => Self::MessageTooOldToBulkDelete,
            50035 => Self::InvalidFormBody,
            130000 => Self::ApiOverloaded,
            _ => Self::Unknown,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownChannel
            | Self::UnknownGuild
            | Self::UnknownMember
            | Self::UnknownMessage
            | Self::UnknownRole
            | Self::UnknownUser
            | Self::UnknownEmoji => ErrorCategory::NotFound,

            Self::MissingAccess | Self::MissingPermissions => ErrorCategory::PermissionDenied,

            Self::RateLimited | Self::SlowmodeRateLimit => ErrorCategory::RateLimit,

            Self::CannotSendEmptyMessage
            | Self::InvalidMessageCount
            | Self::MessageTooOldToBulkDelete
            | Self::InvalidFormBody
            | Self::MaxReactionsReached => ErrorCategory::InvalidInput,

            Self::NetworkError => ErrorCategory::Network,

            Self::InvalidToken | Self::ApiOverloaded | Self::Unknown => ErrorCategory::Unknown,
        }
    }

    /// True if repeating the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::NotFound | ErrorCategory::PermissionDenied | ErrorCategory::InvalidInput
        ) || *self == Self::InvalidToken
    }
}
