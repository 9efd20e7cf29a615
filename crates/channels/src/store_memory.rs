//! In-memory registry for tests and ephemeral runs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    Error, Result,
    store::{Channel, ChannelAdmin, ChannelRegistry, NewChannel, now},
};

/// Registry backed by a `Vec`, preserving registration order. No persistence.
#[derive(Default)]
pub struct InMemoryChannelStore {
    channels: Mutex<Vec<Channel>>,
}

impl InMemoryChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with active channels.
    pub fn with_channels(channels: impl IntoIterator<Item = (i64, &'static str)>) -> Self {
        let t = now();
        let channels = channels
            .into_iter()
            .map(|(channel_id, name)| Channel {
                channel_id,
                display_name: name.to_string(),
                added_by: String::new(),
                is_active: true,
                created_at: t,
                updated_at: t,
            })
            .collect();
        Self {
            channels: Mutex::new(channels),
        }
    }
}

#[async_trait]
impl ChannelRegistry for InMemoryChannelStore {
    async fn find_by_id(&self, channel_id: i64) -> Result<Option<Channel>> {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        Ok(channels.iter().find(|c| c.channel_id == channel_id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Channel>> {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        Ok(channels.iter().filter(|c| c.is_active).cloned().collect())
    }
}

#[async_trait]
impl ChannelAdmin for InMemoryChannelStore {
    async fn insert(&self, channel: NewChannel) -> Result<Channel> {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        if channels.iter().any(|c| c.channel_id == channel.channel_id) {
            return Err(Error::already_exists(channel.channel_id));
        }
        let t = now();
        let stored = Channel {
            channel_id: channel.channel_id,
            display_name: channel.display_name,
            added_by: channel.added_by,
            is_active: true,
            created_at: t,
            updated_at: t,
        };
        channels.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Channel>> {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        Ok(channels.clone())
    }

    async fn set_active(&self, channel_id: i64, active: bool) -> Result<()> {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        let channel = channels
            .iter_mut()
            .find(|c| c.channel_id == channel_id)
            .ok_or_else(|| Error::not_found(channel_id))?;
        channel.is_active = active;
        channel.updated_at = now();
        Ok(())
    }

    async fn remove(&self, channel_id: i64) -> Result<()> {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        let before = channels.len();
        channels.retain(|c| c.channel_id != channel_id);
        if channels.len() == before {
            return Err(Error::not_found(channel_id));
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_channels_are_active_in_order() {
        let store = InMemoryChannelStore::with_channels([(-3, "C"), (-1, "A")]);
        let active = store.list_active().await.unwrap();
        assert_eq!(active[0].channel_id, -3);
        assert_eq!(active[1].channel_id, -1);
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_active() {
        let store = InMemoryChannelStore::with_channels([(-1, "A"), (-2, "B")]);
        store.set_active(-1, false).await.unwrap();
        let active = store.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert!(store.find_by_id(-1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_insert_duplicate() {
        let store = InMemoryChannelStore::new();
        let ch = NewChannel {
            channel_id: -1,
            display_name: "A".into(),
            added_by: String::new(),
        };
        store.insert(ch.clone()).await.unwrap();
        assert!(matches!(
            store.insert(ch).await.unwrap_err(),
            Error::AlreadyExists { .. }
        ));
    }

    #[tokio::test]
    async fn test_remove_not_found() {
        let store = InMemoryChannelStore::new();
        assert!(store.remove(-1).await.is_err());
    }

    #[test]
    fn channel_serializes_for_admin_api() {
        let store = InMemoryChannelStore::with_channels([(-1001, "News")]);
        let channels = store.channels.lock().unwrap();
        let json = serde_json::to_value(&channels[0]).unwrap();
        assert_eq!(json["channel_id"], -1001);
        assert_eq!(json["display_name"], "News");
        assert_eq!(json["is_active"], true);
    }
}
