use std::time::Duration;

use {
    herald_broadcast::BotIdentity,
    herald_config::TelegramConfig,
    secrecy::ExposeSecret,
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{AllowedUpdate, BotCommand},
    },
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use crate::{Error, Result, classify::classify_update, router::UpdateRouter};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Build the bot client, verify the token and prepare the account for long
/// polling. Returns the bot together with its resolved identity.
pub async fn connect(config: &TelegramConfig) -> Result<(Bot, BotIdentity)> {
    let token = config.token.expose_secret();
    if token.trim().is_empty() {
        return Err(Error::message("telegram bot token is not configured"));
    }

    // The HTTP timeout must outlast the long-poll timeout.
    let client = teloxide::net::default_reqwest_settings()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    let bot = Bot::with_client(token, client);

    let me = bot.get_me().await?;
    let identity = BotIdentity {
        id: me.user.id.0,
        username: me.user.username.clone(),
    };

    // Polling does not work while a webhook is registered.
    bot.delete_webhook().send().await?;

    let commands = vec![
        BotCommand::new("start", "Start the bot"),
        BotCommand::new("help", "Show this help message"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!("failed to register bot commands: {e}");
    }

    info!(
        bot_id = identity.id,
        username = ?identity.username,
        "telegram bot connected (webhook cleared)"
    );
    Ok((bot, identity))
}

/// Spawn the long-poll loop. Updates are handled one at a time, in order,
/// until `cancel` fires or another instance takes over the token.
pub fn spawn_polling(
    bot: Bot,
    router: UpdateRouter,
    poll_timeout_secs: u32,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("starting telegram polling loop");
        let mut offset: i32 = 0;

        loop {
            let request = bot
                .get_updates()
                .offset(offset)
                .timeout(poll_timeout_secs)
                .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::ChannelPost])
                .send();

            let result = tokio::select! {
                () = cancel.cancelled() => break,
                result = request => result,
            };

            match result {
                Ok(updates) => {
                    debug!(count = updates.len(), "got telegram updates");
                    for update in updates {
                        offset = update.id.as_offset();
                        match classify_update(&update.kind) {
                            Some(event) => router.route(&event).await,
                            None => debug!("ignoring unsupported update: {:?}", update.kind),
                        }
                    }
                },
                Err(RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) => {
                    error!("telegram polling stopped: another instance is running with this token");
                    cancel.cancel();
                    break;
                },
                Err(e) => {
                    warn!(error = %e, "telegram getUpdates failed");
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        () = tokio::time::sleep(RETRY_DELAY) => {},
                    }
                },
            }
        }
        info!("telegram polling stopped");
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{TelegramPlatform, mock_api::MockTelegramApi},
        herald_announcements::InMemoryAnnouncementStore,
        herald_broadcast::{AdminIdentity, Broadcaster},
        herald_channels::InMemoryChannelStore,
        herald_config::BroadcastConfig,
        secrecy::Secret,
        std::sync::Arc,
    };

    fn router_for(api: &MockTelegramApi) -> UpdateRouter {
        let platform = Arc::new(TelegramPlatform::new(api.bot.clone()));
        let broadcaster = Broadcaster::new(
            Arc::new(InMemoryChannelStore::new()),
            Arc::new(InMemoryAnnouncementStore::new()),
            platform.clone(),
            BotIdentity {
                id: 1,
                username: None,
            },
            AdminIdentity::Unset,
            BroadcastConfig::default(),
        );
        UpdateRouter::new(platform, Arc::new(broadcaster))
    }

    #[tokio::test]
    async fn connect_rejects_missing_token() {
        let config = TelegramConfig {
            token: Secret::new("  ".into()),
            ..TelegramConfig::default()
        };
        let err = connect(&config).await.unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[tokio::test]
    async fn polling_stops_on_cancel() {
        let api = MockTelegramApi::start().await;
        api.respond(
            "getUpdates",
            serde_json::json!({ "ok": true, "result": [] }),
        );
        let router = router_for(&api);
        let cancel = CancellationToken::new();

        let handle = spawn_polling(api.bot.clone(), router, 0, cancel.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("polling loop exits")
            .unwrap();
        assert!(api.requests().iter().any(|r| r.method == "getupdates"));
    }

    #[tokio::test]
    async fn polling_feeds_updates_to_router() {
        let api = MockTelegramApi::start().await;
        api.respond(
            "getUpdates",
            serde_json::json!({ "ok": true, "result": [{
                "update_id": 10,
                "message": {
                    "message_id": 1,
                    "date": 1_700_000_000,
                    "chat": { "id": 55, "type": "private", "first_name": "Ann" },
                    "from": { "id": 55, "is_bot": false, "first_name": "Ann" },
                    "text": "/help"
                }
            }] }),
        );
        let router = router_for(&api);
        let cancel = CancellationToken::new();

        let handle = spawn_polling(api.bot.clone(), router, 0, cancel.clone());
        for _ in 0..100 {
            if !api.sent_messages().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        cancel.cancel();
        handle.await.unwrap();

        let sent = api.sent_messages();
        assert!(sent.contains(&(55, crate::router::HELP_TEXT.to_string())));
        let offsets: Vec<_> = api
            .requests()
            .into_iter()
            .filter(|r| r.method == "getupdates")
            .filter_map(|r| r.body.get("offset").and_then(|v| v.as_i64()))
            .collect();
        assert!(offsets.contains(&11));
    }
}
