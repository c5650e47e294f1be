//! Guild permissions checked by moderation commands

use serde::{Deserialize, Serialize};

/// Permission bits relevant to the built-in moderation commands.
///
/// Values are the Discord permission flag bits so adapters can test
/// a raw permission integer directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    KickMembers,
    BanMembers,
    Administrator,
    ManageChannels,
    ManageMessages,
    ManageRoles,
    ModerateMembers,
}

impl Permission {
    pub const fn bits(self) -> u64 {
        match self {
            Self::KickMembers => 1 << 1,
            Self::BanMembers => 1 << 2,
            Self::Administrator => 1 << 3,
            Self::ManageChannels => 1 << 4,
            Self::ManageMessages => 1 << 13,
            Self::ManageRoles => 1 << 28,
            Self::ModerateMembers => 1 << 40,
        }
    }

    /// True if `granted` includes this permission, directly or through
    /// `ADMINISTRATOR`.
    pub fn is_granted_by(self, granted: u64) -> bool {
        granted & Self::Administrator.bits() != 0 || granted & self.bits() != 0
    }
}
