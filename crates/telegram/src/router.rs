use std::sync::Arc;

use {
    herald_broadcast::{Broadcaster, InboundEvent, InboundKind, Platform},
    tracing::{debug, warn},
};

pub const WELCOME_TEXT: &str = "Welcome! I'm an announcement bot. Send me any message and I'll forward it to all connected channels.";
pub const HELP_TEXT: &str = "Available commands:\n/start - Start the bot\n/help - Show this help message\n\nTo send an announcement, simply send me any message and I'll forward it to all connected channels.";

/// Sends commands to their static replies and everything else to the
/// broadcaster.
pub struct UpdateRouter {
    platform: Arc<dyn Platform>,
    broadcaster: Arc<Broadcaster>,
}

impl UpdateRouter {
    pub fn new(platform: Arc<dyn Platform>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            platform,
            broadcaster,
        }
    }

    pub async fn route(&self, event: &InboundEvent) {
        match &event.kind {
            InboundKind::Command { name } => self.command(event.origin_id, name).await,
            InboundKind::ChannelPost | InboundKind::DirectMessage => {
                let outcome = self.broadcaster.handle(event).await;
                debug!(origin_id = event.origin_id, ?outcome, "inbound event handled");
            },
        }
    }

    async fn command(&self, chat_id: i64, name: &str) {
        let text = match name {
            "start" => WELCOME_TEXT,
            "help" => HELP_TEXT,
            other => {
                debug!(chat_id, command = other, "ignoring unknown command");
                return;
            },
        };
        if let Err(e) = self.platform.send_message(chat_id, text).await {
            warn!(chat_id, command = name, error = %e, "failed to answer command");
        }
    }
}
