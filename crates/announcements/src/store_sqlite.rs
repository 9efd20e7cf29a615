//! SQLite-backed announcement log using sqlx.

use {
    async_trait::async_trait,
    sqlx::{SqlitePool, sqlite::SqlitePoolOptions},
};

use crate::{
    Error, Result,
    store::{Announcement, AnnouncementStore, NewAnnouncement, now},
};

#[derive(sqlx::FromRow)]
struct AnnouncementRow {
    id: i64,
    origin_message_id: i64,
    origin_id: i64,
    text: String,
    posted_by: String,
    posted_at: i64,
    is_published: bool,
    created_at: i64,
}

impl From<AnnouncementRow> for Announcement {
    fn from(r: AnnouncementRow) -> Self {
        Self {
            id: r.id,
            origin_message_id: r.origin_message_id,
            origin_id: r.origin_id,
            text: r.text,
            posted_by: r.posted_by,
            posted_at: r.posted_at,
            is_published: r.is_published,
            created_at: r.created_at,
        }
    }
}

/// SQLite-backed persistence for announcements.
pub struct SqliteAnnouncementStore {
    pool: SqlitePool,
}

impl SqliteAnnouncementStore {
    /// Open a dedicated pool and run migrations.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        crate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Use an existing pool. Call [`crate::run_migrations`] first.
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnouncementStore for SqliteAnnouncementStore {
    async fn create(&self, a: NewAnnouncement) -> Result<i64> {
        let result = sqlx::query(
            r#"INSERT INTO announcements
                 (origin_message_id, origin_id, text, posted_by, posted_at, is_published, created_at)
               VALUES (?, ?, ?, ?, ?, 0, ?)"#,
        )
        .bind(a.origin_message_id)
        .bind(a.origin_id)
        .bind(&a.text)
        .bind(&a.posted_by)
        .bind(a.posted_at)
        .bind(now())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn mark_published(&self, id: i64) -> Result<bool> {
        let result =
            sqlx::query("UPDATE announcements SET is_published = 1 WHERE id = ? AND is_published = 0")
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 1 {
            return Ok(true);
        }
        match self.get(id).await? {
            Some(_) => Ok(false),
            None => Err(Error::not_found(id)),
        }
    }

    async fn get(&self, id: i64) -> Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, AnnouncementRow>("SELECT * FROM announcements WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            "SELECT * FROM announcements ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
