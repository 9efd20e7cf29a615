//! In-memory announcement log. No persistence, for tests only.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    Error, Result,
    store::{Announcement, AnnouncementStore, NewAnnouncement, now},
};

#[derive(Default)]
pub struct InMemoryAnnouncementStore {
    rows: Mutex<Vec<Announcement>>,
}

impl InMemoryAnnouncementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored announcement, oldest first.
    pub fn all(&self) -> Vec<Announcement> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AnnouncementStore for InMemoryAnnouncementStore {
    async fn create(&self, a: NewAnnouncement) -> Result<i64> {
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        let id = rows.len() as i64 + 1;
        rows.push(Announcement {
            id,
            origin_message_id: a.origin_message_id,
            origin_id: a.origin_id,
            text: a.text,
            posted_by: a.posted_by,
            posted_at: a.posted_at,
            is_published: false,
            created_at: now(),
        });
        Ok(id)
    }

    async fn mark_published(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        let row = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found(id))?;
        if row.is_published {
            return Ok(false);
        }
        row.is_published = true;
        Ok(true)
    }

    async fn get(&self, id: i64) -> Result<Option<Announcement>> {
        let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        Ok(rows.iter().find(|a| a.id == id).cloned())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Announcement>> {
        let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        Ok(rows.iter().rev().take(limit as usize).cloned().collect())
    }
}
