use std::{net::SocketAddr, sync::Arc};

use {
    herald_announcements::SqliteAnnouncementStore,
    herald_broadcast::{AdminIdentity, Broadcaster, Platform},
    herald_channels::SqliteChannelStore,
    herald_config::HeraldConfig,
    herald_telegram::{TelegramPlatform, UpdateRouter, bot},
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
};

use crate::{AppState, db, routes::build_app};

/// Run the bot and, when enabled, the admin API until interrupted.
pub async fn start(config: HeraldConfig) -> anyhow::Result<()> {
    let pool = db::open_pool(&config.database.url).await?;
    db::migrate(&pool).await?;

    let channels = Arc::new(SqliteChannelStore::with_pool(pool.clone()));
    let announcements = Arc::new(SqliteAnnouncementStore::with_pool(pool));

    let (telegram, identity) = bot::connect(&config.telegram).await?;
    let platform: Arc<dyn Platform> = Arc::new(TelegramPlatform::new(telegram.clone()));

    let admin = AdminIdentity::parse(&config.telegram.admin_username);
    if admin == AdminIdentity::Unset {
        warn!("no administrator configured, direct messages will be refused");
    }
    info!(
        bot = ?identity.username,
        admin = %config.telegram.admin_username,
        max_concurrency = config.broadcast.max_concurrency,
        "starting herald"
    );

    let broadcaster = Arc::new(Broadcaster::new(
        channels.clone(),
        announcements.clone(),
        Arc::clone(&platform),
        identity,
        admin,
        config.broadcast.clone(),
    ));
    let router = UpdateRouter::new(Arc::clone(&platform), broadcaster);

    let cancel = CancellationToken::new();
    let polling = bot::spawn_polling(
        telegram,
        router,
        config.telegram.poll_timeout_secs,
        cancel.clone(),
    );

    let shutdown = {
        let cancel = cancel.clone();
        async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("shutdown requested"),
                () = cancel.cancelled() => {},
            }
            cancel.cancel();
        }
    };

    if config.server.enabled {
        let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
        let app = build_app(AppState::new(channels, announcements, platform));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "admin api listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
    } else {
        shutdown.await;
    }

    cancel.cancel();
    polling.await?;
    info!("herald stopped");
    Ok(())
}
