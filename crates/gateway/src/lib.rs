//! Process wiring and the admin HTTP API.
//!
//! [`server::start`] opens the database, connects the Telegram bot, runs the
//! long-poll loop and serves the JSON admin API built by [`routes::build_app`].

pub mod db;
pub mod error;
pub mod registration;
pub mod routes;
pub mod server;
pub mod state;

pub use {
    error::{Error, Result},
    state::AppState,
};
