use {
    sqlx::{SqlitePool, sqlite::SqlitePoolOptions},
    tracing::{debug, info},
};

/// Open the SQLite pool named by `database_url`.
pub async fn open_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    // In-memory databases are per connection.
    let max_connections = if database_url.contains(":memory:") {
        1
    } else {
        5
    };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    debug!(database_url, "database pool opened");
    Ok(pool)
}

/// Create or upgrade every herald table.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    herald_channels::run_migrations(pool).await?;
    herald_announcements::run_migrations(pool).await?;
    info!("database migrations applied");
    Ok(())
}
