//! Telegram adapter for the broadcast engine.
//!
//! [`TelegramPlatform`] implements the engine's platform capabilities on top
//! of teloxide; [`bot::spawn_polling`] runs the long-poll loop that decodes
//! updates and feeds them to an [`UpdateRouter`].

pub mod bot;
pub mod classify;
pub mod error;
pub mod platform;
pub mod router;

#[cfg(test)]
mod mock_api;

pub use {
    error::{Error, Result},
    platform::TelegramPlatform,
    router::UpdateRouter,
};
