//! Error types for command execution

use discord_types::DiscordErrorCode;
use thiserror::Error;

/// Reply sent when a command fails for a reason the user can't act on.
pub const GENERIC_FAILURE_REPLY: &str = "❌ Error executing command.";

/// Failure of a single Discord REST call.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Discord API error (HTTP {status}, {code:?}): {message}")]
    Discord {
        code: DiscordErrorCode,
        status: u16,
        message: String,
    },

    #[error("Rate limited")]
    RateLimited,

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn code(&self) -> DiscordErrorCode {
        match self {
            Self::Discord { code, .. } => *code,
            Self::RateLimited => DiscordErrorCode::RateLimited,
            Self::Transport(_) => DiscordErrorCode::NetworkError,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.code().is_permanent()
    }
}

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a command invocation.
///
/// Every variant ends in exactly one reply to the invoking channel:
/// `Rejected` carries its own user-facing text, everything else maps to
/// [`GENERIC_FAILURE_REPLY`].
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{reply}")]
    Rejected {
        reply: String,
        #[source]
        cause: Option<Cause>,
    },

    #[error("Discord API error: {0}")]
    Api(#[from] ApiError),

    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Command panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CommandError {
    /// Refuse the invocation with a user-facing reason.
    pub fn rejected(reply: impl Into<String>) -> Self {
        Self::Rejected {
            reply: reply.into(),
            cause: None,
        }
    }

    /// Refuse the invocation, keeping the underlying failure for the log.
    pub fn rejected_by(
        reply: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Rejected {
            reply: reply.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Text sent back to the channel for this failure.
    pub fn user_reply(&self) -> &str {
        match self {
            Self::Rejected { reply, .. } => reply,
            _ => GENERIC_FAILURE_REPLY,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Result of running a command.
pub type CommandResult<T = ()> = std::result::Result<T, CommandError>;

/// Turn an API failure into a rejection with fixed user-facing text.
pub trait RejectOnFailure<T> {
    fn or_reject(self, reply: &str) -> CommandResult<T>;
}

impl<T> RejectOnFailure<T> for std::result::Result<T, ApiError> {
    fn or_reject(self, reply: &str) -> CommandResult<T> {
        self.map_err(|e| CommandError::rejected_by(reply, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_permissions() -> ApiError {
        ApiError::Discord {
            code: DiscordErrorCode::MissingPermissions,
            status: 403,
            message: "Missing Permissions".to_string(),
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            missing_permissions().to_string(),
            "Discord API error (HTTP 403, MissingPermissions): Missing Permissions"
        );
    }

    #[test]
    fn test_api_error_codes() {
        assert!(missing_permissions().is_permanent());
        assert_eq!(ApiError::RateLimited.code(), DiscordErrorCode::RateLimited);
        assert!(!ApiError::Transport("reset".to_string()).is_permanent());
    }

    #[test]
    fn test_rejected_reply_is_user_text() {
        let err = CommandError::rejected("You lack permission.");
        assert_eq!(err.user_reply(), "You lack permission.");
        assert_eq!(err.to_string(), "You lack permission.");
        assert!(err.is_rejection());
    }

    #[test]
    fn test_internal_errors_use_generic_reply() {
        let err: CommandError = missing_permissions().into();
        assert_eq!(err.user_reply(), GENERIC_FAILURE_REPLY);
        assert!(!err.is_rejection());

        let err: CommandError = anyhow::anyhow!("boom").into();
        assert_eq!(err.user_reply(), GENERIC_FAILURE_REPLY);

        let err = CommandError::Panicked("index out of bounds".to_string());
        assert_eq!(err.user_reply(), GENERIC_FAILURE_REPLY);
    }

    #[test]
    fn test_or_reject_keeps_cause() {
        let result: Result<(), ApiError> = Err(missing_permissions());
        let err = result.or_reject("Failed to kick.").unwrap_err();
        assert_eq!(err.user_reply(), "Failed to kick.");
        let source = std::error::Error::source(&err).expect("cause");
        assert!(source.to_string().contains("Missing Permissions"));
    }
}
