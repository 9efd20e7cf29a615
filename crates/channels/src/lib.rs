//! Destination channel registry.
//!
//! The broadcast dispatcher reads the registry through [`ChannelRegistry`];
//! the admin surface mutates it through [`ChannelAdmin`]. Both SQLite and
//! in-memory backends keep channels in registration order.

pub mod error;
pub mod normalize;
pub mod store;
pub mod store_memory;
pub mod store_sqlite;

pub use {
    error::{Error, Result},
    normalize::normalize_channel_identifier,
    store::{Channel, ChannelAdmin, ChannelRegistry, NewChannel},
    store_memory::InMemoryChannelStore,
    store_sqlite::SqliteChannelStore,
};

/// Run database migrations for the channel registry.
///
/// Creates the `channels` table. Safe to call on a pool shared with other
/// herald crates.
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
