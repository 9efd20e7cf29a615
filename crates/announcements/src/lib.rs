//! Persisted log of broadcast announcements.
//!
//! An announcement row is written before any destination is contacted and
//! flipped to published at most once, at the end of the dispatch pass.

pub mod error;
pub mod store;
pub mod store_memory;
pub mod store_sqlite;

pub use {
    error::{Error, Result},
    store::{Announcement, AnnouncementStore, CHANNEL_POSTER, NewAnnouncement},
    store_memory::InMemoryAnnouncementStore,
    store_sqlite::SqliteAnnouncementStore,
};

/// Run database migrations for the announcement log.
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
