use {async_trait::async_trait, serde::Serialize};

use crate::Result;

/// A registered destination channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// Fully-qualified platform chat id (e.g. `-1001234567890`).
    pub channel_id: i64,
    pub display_name: String,
    pub added_by: String,
    /// Only active channels take part in fan-out.
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for registering a channel. New channels start active.
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub channel_id: i64,
    pub display_name: String,
    pub added_by: String,
}

/// Read-only view of the registry used by the dispatcher.
#[async_trait]
pub trait ChannelRegistry: Send + Sync {
    async fn find_by_id(&self, channel_id: i64) -> Result<Option<Channel>>;

    /// Active channels in registration order.
    async fn list_active(&self) -> Result<Vec<Channel>>;
}

/// Mutating operations used by the admin surface.
#[async_trait]
pub trait ChannelAdmin: ChannelRegistry {
    /// Store a new active channel. Fails with [`crate::Error::AlreadyExists`]
    /// when the id is taken.
    async fn insert(&self, channel: NewChannel) -> Result<Channel>;
    async fn list_all(&self) -> Result<Vec<Channel>>;
    async fn set_active(&self, channel_id: i64, active: bool) -> Result<()>;
    /// Hard delete.
    async fn remove(&self, channel_id: i64) -> Result<()>;
}

pub(crate) fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
