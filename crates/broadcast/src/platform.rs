use async_trait::async_trait;

use crate::Result;

/// Proof that the platform still resolves a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatInfo {
    pub id: i64,
}

/// A user's standing in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberRole {
    /// Only creators and administrators may post into a channel.
    #[must_use]
    pub fn can_post(self) -> bool {
        matches!(self, Self::Creator | Self::Administrator)
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Creator => "creator",
            Self::Administrator => "administrator",
            Self::Member => "member",
            Self::Restricted => "restricted",
            Self::Left => "left",
            Self::Banned => "banned",
        };
        f.write_str(s)
    }
}

/// Acknowledgement for a delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message_id: i64,
}

/// The sending identity, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: u64,
    pub username: Option<String>,
}

/// Messaging platform capabilities the engine needs.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn get_chat(&self, chat_id: i64) -> Result<ChatInfo>;
    async fn get_membership(&self, chat_id: i64, user_id: u64) -> Result<MemberRole>;
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<SentMessage>;
}
