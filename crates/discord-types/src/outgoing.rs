//! Messages the bot sends back to Discord

use serde::{Deserialize, Serialize};

use crate::types::Embed;

/// Content of a message to send, reply with, or post to a channel
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutgoingMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default)]
    pub embeds: Vec<Embed>,
}

impl OutgoingMessage {
    /// Plain-text message
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embeds: Vec::new(),
        }
    }

    /// Message carrying a single embed and no text
    pub fn embed(embed: Embed) -> Self {
        Self {
            content: String::new(),
            embeds: vec![embed],
        }
    }
}

impl From<&str> for OutgoingMessage {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for OutgoingMessage {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}

impl From<Embed> for OutgoingMessage {
    fn from(embed: Embed) -> Self {
        Self::embed(embed)
    }
}
