//! SQLite-backed channel registry using sqlx.

use {
    async_trait::async_trait,
    sqlx::{SqlitePool, sqlite::SqlitePoolOptions},
    tracing::debug,
};

use crate::{
    Error, Result,
    store::{Channel, ChannelAdmin, ChannelRegistry, NewChannel, now},
};

/// Internal row type for sqlx mapping.
#[derive(sqlx::FromRow)]
struct ChannelRow {
    channel_id: i64,
    display_name: String,
    added_by: String,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

impl From<ChannelRow> for Channel {
    fn from(r: ChannelRow) -> Self {
        Self {
            channel_id: r.channel_id,
            display_name: r.display_name,
            added_by: r.added_by,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "SELECT channel_id, display_name, added_by, is_active, created_at, updated_at FROM channels";

/// SQLite-backed channel registry.
pub struct SqliteChannelStore {
    pool: SqlitePool,
}

impl SqliteChannelStore {
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
impl ChannelRegistry for SqliteChannelStore {
    async fn find_by_id(&self, channel_id: i64) -> Result<Option<Channel>> {
        let row = sqlx::query_as::<_, ChannelRow>(&format!(
            "{SELECT_COLUMNS} WHERE channel_id = ?"
        ))
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_active(&self) -> Result<Vec<Channel>> {
        let rows = sqlx::query_as::<_, ChannelRow>(&format!(
            "{SELECT_COLUMNS} WHERE is_active = 1 ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ChannelAdmin for SqliteChannelStore {
    async fn insert(&self, channel: NewChannel) -> Result<Channel> {
        let t = now();
        let result = sqlx::query(
            r#"INSERT INTO channels (channel_id, display_name, added_by, is_active, created_at, updated_at)
               VALUES (?, ?, ?, 1, ?, ?)"#,
        )
        .bind(channel.channel_id)
        .bind(&channel.display_name)
        .bind(&channel.added_by)
        .bind(t)
        .bind(t)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {},
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(Error::already_exists(channel.channel_id));
            },
            Err(e) => return Err(e.into()),
        }
        debug!(channel_id = channel.channel_id, "channel registered");

        Ok(Channel {
            channel_id: channel.channel_id,
            display_name: channel.display_name,
            added_by: channel.added_by,
            is_active: true,
            created_at: t,
            updated_at: t,
        })
    }

    async fn list_all(&self) -> Result<Vec<Channel>> {
        let rows = sqlx::query_as::<_, ChannelRow>(&format!("{SELECT_COLUMNS} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_active(&self, channel_id: i64, active: bool) -> Result<()> {
        let result =
            sqlx::query("UPDATE channels SET is_active = ?, updated_at = ? WHERE channel_id = ?")
                .bind(active)
                .bind(now())
                .bind(channel_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(channel_id));
        }
        Ok(())
    }

    async fn remove(&self, channel_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM channels WHERE channel_id = ?")
            .bind(channel_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(channel_id));
        }
        Ok(())
    }
}
