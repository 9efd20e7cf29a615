//! Config schema types (telegram, broadcast, database, server).

use std::time::Duration;

use {
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeraldConfig {
    pub telegram: TelegramConfig,
    pub broadcast: BroadcastConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

/// Bot credentials and polling behaviour.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub token: Secret<String>,

    /// The single identity allowed to author announcements by direct message.
    /// Either a username (with or without `@`) or a numeric user id.
    pub admin_username: String,

    /// Long-polling timeout passed to `getUpdates`.
    pub poll_timeout_secs: u32,

    /// HTTP client timeout. Must exceed `poll_timeout_secs`.
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("admin_username", &self.admin_username)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish_non_exhaustive()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            admin_username: String::new(),
            poll_timeout_secs: 30,
            request_timeout_secs: 45,
        }
    }
}

/// When an announcement is flipped to published after a dispatch pass.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PublishPolicy {
    /// Publish once the pass completes, even if every destination failed.
    #[default]
    Always,
    /// Publish only when at least one destination received the message.
    OnSuccess,
}

/// What to do with a channel post whose text is empty after trimming.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmptyChannelPostPolicy {
    /// Ignore the post silently.
    #[default]
    Drop,
    /// Record and fan out the post as-is.
    Forward,
}

/// Fan-out tuning and dispatch policies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Destinations validated and sent to in parallel.
    pub max_concurrency: usize,
    /// Upper bound for one destination's validate + send.
    pub destination_timeout_secs: u64,
    /// Upper bound for the whole pass; unfinished destinations fail as timed out.
    pub pass_deadline_secs: u64,
    pub publish_policy: PublishPolicy,
    pub empty_channel_post_policy: EmptyChannelPostPolicy,
    /// Post the delivery summary back into the origin channel for channel posts.
    /// Direct messages always get a reply.
    pub report_channel_posts: bool,
}

impl BroadcastConfig {
    #[must_use]
    pub fn destination_timeout(&self) -> Duration {
        Duration::from_secs(self.destination_timeout_secs)
    }

    #[must_use]
    pub fn pass_deadline(&self) -> Duration {
        Duration::from_secs(self.pass_deadline_secs)
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            destination_timeout_secs: 15,
            pass_deadline_secs: 120,
            publish_policy: PublishPolicy::default(),
            empty_channel_post_policy: EmptyChannelPostPolicy::default(),
            report_channel_posts: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite connection URL.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:herald.db?mode=rwc".into(),
        }
    }
}

/// Admin HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,
    /// Address to bind to. Defaults to "127.0.0.1"; the admin API is unauthenticated.
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret};

    #[test]
    fn defaults() {
        let cfg = HeraldConfig::default();
        assert_eq!(cfg.broadcast.max_concurrency, 4);
        assert_eq!(cfg.broadcast.destination_timeout(), Duration::from_secs(15));
        assert_eq!(cfg.broadcast.publish_policy, PublishPolicy::Always);
        assert_eq!(
            cfg.broadcast.empty_channel_post_policy,
            EmptyChannelPostPolicy::Drop
        );
        assert!(!cfg.broadcast.report_channel_posts);
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.telegram.poll_timeout_secs, 30);
    }

    #[test]
    fn deserialize_partial_toml() {
        let raw = r#"
            [telegram]
            token = "123:ABC"
            admin_username = "@boss"

            [broadcast]
            publish_policy = "on_success"
            empty_channel_post_policy = "forward"
            max_concurrency = 8
        "#;
        let cfg: HeraldConfig = toml::from_str(raw).unwrap();
        assert_eq!(cfg.telegram.token.expose_secret(), "123:ABC");
        assert_eq!(cfg.telegram.admin_username, "@boss");
        assert_eq!(cfg.broadcast.publish_policy, PublishPolicy::OnSuccess);
        assert_eq!(
            cfg.broadcast.empty_channel_post_policy,
            EmptyChannelPostPolicy::Forward
        );
        assert_eq!(cfg.broadcast.max_concurrency, 8);
        // unspecified fields keep defaults
        assert_eq!(cfg.broadcast.pass_deadline_secs, 120);
        assert_eq!(cfg.telegram.request_timeout_secs, 45);
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = TelegramConfig {
            token: Secret::new("123:SECRET".into()),
            ..Default::default()
        };
        let out = format!("{cfg:?}");
        assert!(!out.contains("SECRET"));
        assert!(out.contains("[REDACTED]"));
    }
}
