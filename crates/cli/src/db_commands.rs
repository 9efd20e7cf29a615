use {clap::Subcommand, herald_config::HeraldConfig, sqlx::SqlitePool};

#[derive(Subcommand)]
pub enum DbAction {
    /// Run all pending database migrations.
    Migrate,
}

pub async fn handle_db(action: DbAction, config: &HeraldConfig) -> anyhow::Result<()> {
    match action {
        DbAction::Migrate => {
            let pool = open_migrated(config).await?;
            pool.close().await;
            println!("Migrations applied to {}", config.database.url);
            Ok(())
        },
    }
}

/// Open the configured database with its schema up to date.
pub async fn open_migrated(config: &HeraldConfig) -> anyhow::Result<SqlitePool> {
    let pool = herald_gateway::db::open_pool(&config.database.url).await?;
    herald_gateway::db::migrate(&pool).await?;
    Ok(pool)
}
