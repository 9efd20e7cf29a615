use {async_trait::async_trait, serde::Serialize};

use crate::Result;

/// `posted_by` value for announcements that originate from a channel post,
/// which carries no sender.
pub const CHANNEL_POSTER: &str = "channel";

/// A persisted announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    pub id: i64,
    pub origin_message_id: i64,
    pub origin_id: i64,
    pub text: String,
    pub posted_by: String,
    /// Unix seconds of the original message.
    pub posted_at: i64,
    pub is_published: bool,
    pub created_at: i64,
}

/// Fields supplied when an announcement is first recorded.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub origin_message_id: i64,
    pub origin_id: i64,
    pub text: String,
    pub posted_by: String,
    pub posted_at: i64,
}

#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    /// Persist an unpublished announcement and return its id.
    async fn create(&self, announcement: NewAnnouncement) -> Result<i64>;

    /// Flip `is_published` from false to true.
    ///
    /// Returns `false` when the announcement was already published; the flag
    /// never goes back to false.
    async fn mark_published(&self, id: i64) -> Result<bool>;

    async fn get(&self, id: i64) -> Result<Option<Announcement>>;

    /// Most recent announcements first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<Announcement>>;
}

pub(crate) fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
