//! Serenity error classification.
//!
//! Every serenity failure surfaced by the `DiscordApi` adapter is mapped to a
//! [`ApiError`] carrying the Discord JSON error code, so command handlers and
//! the dispatcher can tell permanent failures from transient ones.

use discord_commands::ApiError;
use discord_types::DiscordErrorCode;
use serenity::http::HttpError;
use tracing::debug;

/// Classify a serenity `Error` into an [`ApiError`].
pub fn classify(err: serenity::Error) -> ApiError {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => classify_response(
            resp.status_code.as_u16(),
            resp.error.code,
            resp.error.message,
        ),
        other => {
            debug!("Non-API serenity error: {}", other);
            ApiError::Transport(other.to_string())
        }
    }
}

/// Map an unsuccessful REST response to an [`ApiError`].
///
/// `raw_code` is the `code` field of Discord's JSON error body. Serenity
/// reports `-1` when the body could not be decoded.
pub fn classify_response(status: u16, raw_code: isize, message: String) -> ApiError {
    if status == 429 {
        return ApiError::RateLimited;
    }
    let code = u32::try_from(raw_code).map_or(DiscordErrorCode::Unknown, DiscordErrorCode::from_raw);
    ApiError::Discord {
        code,
        status,
        message,
    }
}
