use {
    async_trait::async_trait,
    herald_broadcast::{ChatInfo, Error, MemberRole, Platform, Result, SentMessage},
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{ChatMemberKind, UserId},
    },
    tracing::debug,
};

/// Broadcast platform backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn member_role(kind: &ChatMemberKind) -> MemberRole {
    if kind.is_owner() {
        MemberRole::Creator
    } else if kind.is_administrator() {
        MemberRole::Administrator
    } else if kind.is_restricted() {
        MemberRole::Restricted
    } else if kind.is_left() {
        MemberRole::Left
    } else if kind.is_banned() {
        MemberRole::Banned
    } else {
        MemberRole::Member
    }
}

#[async_trait]
impl Platform for TelegramPlatform {
    async fn get_chat(&self, chat_id: i64) -> Result<ChatInfo> {
        match self.bot.get_chat(ChatId(chat_id)).await {
            Ok(_) => Ok(ChatInfo { id: chat_id }),
            Err(RequestError::Api(ApiError::ChatNotFound)) => Err(Error::chat_not_found(chat_id)),
            Err(e) => Err(Error::external("getChat", e)),
        }
    }

    async fn get_membership(&self, chat_id: i64, user_id: u64) -> Result<MemberRole> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), UserId(user_id))
            .await
            .map_err(|e| Error::external("getChatMember", e))?;
        let role = member_role(&member.kind);
        debug!(chat_id, user_id, %role, "resolved chat membership");
        Ok(role)
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<SentMessage> {
        let message = self
            .bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(|e| Error::external("sendMessage", e))?;
        Ok(SentMessage {
            chat_id,
            message_id: i64::from(message.id.0),
        })
    }
}
