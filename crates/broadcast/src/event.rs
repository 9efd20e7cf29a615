//! Decoded inbound events handed to the engine by a platform router.

/// What kind of inbound message this is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundKind {
    /// A bot command such as `/start`. Handled outside the engine.
    Command { name: String },
    /// A post published in a channel the bot can see.
    ChannelPost,
    /// A message sent to the bot by a user.
    DirectMessage,
}

/// The user behind a direct message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub kind: InboundKind,
    /// Chat the message arrived in; replies go here.
    pub origin_id: i64,
    /// Absent for channel posts.
    pub sender: Option<Sender>,
    pub message_id: i64,
    pub text: String,
    /// Unix seconds of the original message.
    pub timestamp: i64,
}

impl InboundEvent {
    #[must_use]
    pub fn is_direct_message(&self) -> bool {
        self.kind == InboundKind::DirectMessage
    }
}
