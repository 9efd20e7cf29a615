use std::sync::Arc;

use tracing::debug;

use crate::{
    dispatcher::FailureReason,
    platform::{BotIdentity, Platform},
};

/// Checks that a destination is still reachable and that the bot may post
/// there. Holds no state between calls.
#[derive(Clone)]
pub struct DestinationValidator {
    platform: Arc<dyn Platform>,
    bot: BotIdentity,
}

impl DestinationValidator {
    pub fn new(platform: Arc<dyn Platform>, bot: BotIdentity) -> Self {
        Self { platform, bot }
    }

    pub async fn validate(&self, chat_id: i64) -> Result<(), FailureReason> {
        if let Err(e) = self.platform.get_chat(chat_id).await {
            return Err(FailureReason::Unreachable(e.to_string()));
        }

        match self.platform.get_membership(chat_id, self.bot.id).await {
            Ok(role) if role.can_post() => {
                debug!(chat_id, %role, "destination validated");
                Ok(())
            },
            Ok(role) => Err(FailureReason::InsufficientPrivilege(format!(
                "bot is {role}"
            ))),
            Err(e) => Err(FailureReason::InsufficientPrivilege(e.to_string())),
        }
    }
}
