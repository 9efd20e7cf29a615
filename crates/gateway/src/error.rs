use {
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
    /// The platform could not resolve the chat during registration.
    #[error(
        "failed to get chat information for {identifier:?}: {message}. Ensure the bot is added to the channel and the id is correct"
    )]
    Unreachable { identifier: String, message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Channels(#[from] herald_channels::Error),

    #[error(transparent)]
    Announcements(#[from] herald_announcements::Error),
}

impl Error {
    #[must_use]
    pub fn unreachable(identifier: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Unreachable {
            identifier: identifier.into(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unreachable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest { .. } | Self::Channels(herald_channels::Error::InvalidIdentifier { .. }) => {
                StatusCode::BAD_REQUEST
            },
            Self::Channels(herald_channels::Error::AlreadyExists { .. }) => StatusCode::CONFLICT,
            Self::Channels(herald_channels::Error::NotFound { .. })
            | Self::Announcements(herald_announcements::Error::NotFound { .. }) => {
                StatusCode::NOT_FOUND
            },
            Self::Channels(_) | Self::Announcements(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
