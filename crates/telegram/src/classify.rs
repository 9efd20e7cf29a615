//! Decodes Telegram updates into engine events.

use {
    herald_broadcast::{InboundEvent, InboundKind, Sender},
    teloxide::types::{Message, UpdateKind},
};

/// Map an update to an inbound event. Updates the bot does not act on yield
/// `None`.
pub fn classify_update(kind: &UpdateKind) -> Option<InboundEvent> {
    match kind {
        UpdateKind::ChannelPost(msg) => Some(event(msg, InboundKind::ChannelPost)),
        UpdateKind::Message(msg) => Some(classify_message(msg)),
        _ => None,
    }
}

/// Classify a regular message: commands first, then channel-typed chats,
/// then everything else as a direct message.
pub fn classify_message(msg: &Message) -> InboundEvent {
    let kind = match msg.text().and_then(command_name) {
        Some(name) => InboundKind::Command { name },
        None if msg.chat.is_channel() => InboundKind::ChannelPost,
        None => InboundKind::DirectMessage,
    };
    event(msg, kind)
}

/// `/help@herald_bot extra` -> `help`.
fn command_name(text: &str) -> Option<String> {
    let head = text.strip_prefix('/')?.split_whitespace().next()?;
    let name = head.split('@').next().unwrap_or(head);
    (!name.is_empty()).then(|| name.to_ascii_lowercase())
}

fn event(msg: &Message, kind: InboundKind) -> InboundEvent {
    let sender = match kind {
        InboundKind::ChannelPost => None,
        _ => msg.from.as_ref().map(|u| Sender {
            id: u.id.0,
            username: u.username.clone(),
        }),
    };
    InboundEvent {
        kind,
        origin_id: msg.chat.id.0,
        sender,
        message_id: i64::from(msg.id.0),
        text: msg.text().unwrap_or_default().to_string(),
        timestamp: msg.date.timestamp(),
    }
}
