use thiserror::Error;

/// Crate-wide result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A channel with the same platform identifier is already registered.
    #[error("channel {channel_id} is already registered")]
    AlreadyExists { channel_id: i64 },

    #[error("unknown channel: {channel_id}")]
    NotFound { channel_id: i64 },

    /// User-supplied identifier could not be mapped to a channel id.
    #[error("invalid channel identifier: {message}")]
    InvalidIdentifier { message: String },

    /// The backing store cannot be reached.
    #[error("channel registry unavailable: {message}")]
    Unavailable { message: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl Error {
    #[must_use]
    pub fn already_exists(channel_id: i64) -> Self {
        Self::AlreadyExists { channel_id }
    }

    #[must_use]
    pub fn not_found(channel_id: i64) -> Self {
        Self::NotFound { channel_id }
    }

    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn invalid_identifier(message: impl std::fmt::Display) -> Self {
        Self::InvalidIdentifier {
            message: message.to_string(),
        }
    }
}
