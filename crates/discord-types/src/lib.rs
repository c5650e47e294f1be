//! Shared types for the prefix-command Discord bot

pub mod errors;
pub mod outgoing;
pub mod permissions;
pub mod types;

pub use errors::{DiscordErrorCode, ErrorCategory};
pub use outgoing::OutgoingMessage;
pub use permissions::Permission;
pub use types::*;
