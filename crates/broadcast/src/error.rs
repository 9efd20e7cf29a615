use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The platform does not know the chat, or the bot cannot see it.
    #[error("chat not found: {chat_id}")]
    ChatNotFound { chat_id: i64 },

    #[error("{message}")]
    Message { message: String },

    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn chat_not_found(chat_id: i64) -> Self {
        Self::ChatNotFound { chat_id }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
