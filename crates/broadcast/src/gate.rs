//! Decides whether an inbound message may become an announcement.

use std::sync::Arc;

use {
    herald_announcements::{CHANNEL_POSTER, NewAnnouncement},
    herald_channels::ChannelRegistry,
    herald_config::EmptyChannelPostPolicy,
    tracing::{debug, warn},
};

use crate::{
    event::{InboundEvent, InboundKind, Sender},
    report,
};

/// The single identity allowed to author announcements by direct message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminIdentity {
    Username(String),
    UserId(u64),
    /// Nobody is configured; every direct message is rejected.
    Unset,
}

impl AdminIdentity {
    /// Parse the configured value: a numeric user id, or a username with or
    /// without a leading `@`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim().trim_start_matches('@');
        if trimmed.is_empty() {
            return Self::Unset;
        }
        match trimmed.parse::<u64>() {
            Ok(id) => Self::UserId(id),
            Err(_) => Self::Username(trimmed.to_string()),
        }
    }

    /// Usernames compare case-insensitively, as the platform treats them.
    #[must_use]
    pub fn matches(&self, sender: &Sender) -> bool {
        match self {
            Self::Username(name) => sender
                .username
                .as_deref()
                .is_some_and(|u| u.eq_ignore_ascii_case(name)),
            Self::UserId(id) => sender.id == *id,
            Self::Unset => false,
        }
    }

    /// Value recorded as `posted_by` for announcements from this sender.
    fn poster_name(sender: &Sender) -> String {
        sender
            .username
            .clone()
            .unwrap_or_else(|| sender.id.to_string())
    }
}

/// A user-visible refusal. Only produced for direct messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Unauthorized,
    EmptyText,
}

impl Rejection {
    #[must_use]
    pub fn reply_text(self) -> &'static str {
        match self {
            Self::Unauthorized => report::UNAUTHORIZED,
            Self::EmptyText => report::EMPTY_TEXT,
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "sender is not the administrator"),
            Self::EmptyText => write!(f, "announcement text is empty"),
        }
    }
}

/// A silent refusal: nothing is stored and nobody is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Command,
    UnknownOrigin,
    RegistryUnavailable,
    EmptyChannelPost,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "commands are not announcements"),
            Self::UnknownOrigin => write!(f, "origin channel is not registered"),
            Self::RegistryUnavailable => write!(f, "channel registry unavailable"),
            Self::EmptyChannelPost => write!(f, "channel post has no text"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Decision {
    Accept(NewAnnouncement),
    Reject(Rejection),
    Drop(DropReason),
}

pub struct AuthorizationGate {
    registry: Arc<dyn ChannelRegistry>,
    admin: AdminIdentity,
    empty_channel_posts: EmptyChannelPostPolicy,
}

impl AuthorizationGate {
    pub fn new(
        registry: Arc<dyn ChannelRegistry>,
        admin: AdminIdentity,
        empty_channel_posts: EmptyChannelPostPolicy,
    ) -> Self {
        Self {
            registry,
            admin,
            empty_channel_posts,
        }
    }

    /// Classify an inbound event. Reads the registry for channel posts and
    /// writes nothing.
    pub async fn authorize(&self, event: &InboundEvent) -> Decision {
        match event.kind {
            InboundKind::Command { .. } => Decision::Drop(DropReason::Command),
            InboundKind::ChannelPost => self.authorize_channel_post(event).await,
            InboundKind::DirectMessage => self.authorize_direct_message(event),
        }
    }

    async fn authorize_channel_post(&self, event: &InboundEvent) -> Decision {
        match self.registry.find_by_id(event.origin_id).await {
            Ok(Some(channel)) => {
                debug!(
                    channel_id = channel.channel_id,
                    channel = %channel.display_name,
                    "channel post from registered channel"
                );
            },
            Ok(None) => return Decision::Drop(DropReason::UnknownOrigin),
            Err(e) => {
                warn!(origin_id = event.origin_id, error = %e, "registry lookup failed");
                return Decision::Drop(DropReason::RegistryUnavailable);
            },
        }

        if event.text.trim().is_empty()
            && self.empty_channel_posts == EmptyChannelPostPolicy::Drop
        {
            return Decision::Drop(DropReason::EmptyChannelPost);
        }

        Decision::Accept(draft(event, CHANNEL_POSTER.to_string()))
    }

    fn authorize_direct_message(&self, event: &InboundEvent) -> Decision {
        let Some(sender) = event.sender.as_ref().filter(|s| self.admin.matches(s)) else {
            return Decision::Reject(Rejection::Unauthorized);
        };
        if event.text.trim().is_empty() {
            return Decision::Reject(Rejection::EmptyText);
        }
        Decision::Accept(draft(event, AdminIdentity::poster_name(sender)))
    }
}

fn draft(event: &InboundEvent, posted_by: String) -> NewAnnouncement {
    NewAnnouncement {
        origin_message_id: event.message_id,
        origin_id: event.origin_id,
        text: event.text.clone(),
        posted_by,
        posted_at: event.timestamp,
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        async_trait::async_trait,
        herald_channels::{Channel, InMemoryChannelStore},
        rstest::rstest,
    };

    fn gate(policy: EmptyChannelPostPolicy) -> AuthorizationGate {
        let registry = InMemoryChannelStore::with_channels([(-1001, "News")]);
        AuthorizationGate::new(Arc::new(registry), AdminIdentity::parse("@boss"), policy)
    }

    fn dm(username: Option<&str>, text: &str) -> InboundEvent {
        InboundEvent {
            kind: InboundKind::DirectMessage,
            origin_id: 77,
            sender: Some(Sender {
                id: 77,
                username: username.map(String::from),
            }),
            message_id: 5,
            text: text.into(),
            timestamp: 1_700_000_000,
        }
    }

    fn channel_post(origin_id: i64, text: &str) -> InboundEvent {
        InboundEvent {
            kind: InboundKind::ChannelPost,
            origin_id,
            sender: None,
            message_id: 9,
            text: text.into(),
            timestamp: 1_700_000_100,
        }
    }

    #[rstest]
    #[case("boss", AdminIdentity::Username("boss".into()))]
    #[case("@boss", AdminIdentity::Username("boss".into()))]
    #[case("  @boss ", AdminIdentity::Username("boss".into()))]
    #[case("377114917", AdminIdentity::UserId(377114917))]
    #[case("", AdminIdentity::Unset)]
    #[case("@", AdminIdentity::Unset)]
    fn parse_admin_identity(#[case] raw: &str, #[case] expected: AdminIdentity) {
        assert_eq!(AdminIdentity::parse(raw), expected);
    }

    #[test]
    fn admin_matches_username_case_insensitively() {
        let admin = AdminIdentity::parse("Boss");
        let sender = Sender {
            id: 1,
            username: Some("boss".into()),
        };
        assert!(admin.matches(&sender));
    }

    #[test]
    fn admin_matches_by_user_id() {
        let admin = AdminIdentity::parse("42");
        assert!(admin.matches(&Sender {
            id: 42,
            username: None
        }));
        assert!(!admin.matches(&Sender {
            id: 43,
            username: Some("42".into())
        }));
    }

    #[test]
    fn unset_admin_matches_nobody() {
        let sender = Sender {
            id: 0,
            username: Some(String::new()),
        };
        assert!(!AdminIdentity::Unset.matches(&sender));
    }

    #[tokio::test]
    async fn admin_dm_is_accepted() {
        let decision = gate(EmptyChannelPostPolicy::Drop)
            .authorize(&dm(Some("boss"), "Hello all"))
            .await;
        let Decision::Accept(draft) = decision else {
            panic!("expected accept, got {decision:?}");
        };
        assert_eq!(draft.posted_by, "boss");
        assert_eq!(draft.origin_id, 77);
        assert_eq!(draft.origin_message_id, 5);
        assert_eq!(draft.posted_at, 1_700_000_000);
        assert_eq!(draft.text, "Hello all");
    }

    #[rstest]
    #[case(Some("mallory"))]
    #[case(None)]
    #[tokio::test]
    async fn non_admin_dm_is_rejected(#[case] username: Option<&str>) {
        let decision = gate(EmptyChannelPostPolicy::Drop)
            .authorize(&dm(username, "Hello all"))
            .await;
        assert!(matches!(decision, Decision::Reject(Rejection::Unauthorized)));
    }

    #[tokio::test]
    async fn dm_without_sender_is_rejected() {
        let mut event = dm(Some("boss"), "hi");
        event.sender = None;
        let decision = gate(EmptyChannelPostPolicy::Drop).authorize(&event).await;
        assert!(matches!(decision, Decision::Reject(Rejection::Unauthorized)));
    }

    #[rstest]
    #[case("")]
    #[case("   \n\t")]
    #[tokio::test]
    async fn empty_admin_dm_is_rejected(#[case] text: &str) {
        let decision = gate(EmptyChannelPostPolicy::Forward)
            .authorize(&dm(Some("boss"), text))
            .await;
        assert!(matches!(decision, Decision::Reject(Rejection::EmptyText)));
    }

    #[tokio::test]
    async fn unauthorized_takes_precedence_over_empty_text() {
        let decision = gate(EmptyChannelPostPolicy::Drop)
            .authorize(&dm(Some("mallory"), " "))
            .await;
        assert!(matches!(decision, Decision::Reject(Rejection::Unauthorized)));
    }

    #[tokio::test]
    async fn registered_channel_post_is_accepted() {
        let decision = gate(EmptyChannelPostPolicy::Drop)
            .authorize(&channel_post(-1001, "Release 1.2 is out"))
            .await;
        let Decision::Accept(draft) = decision else {
            panic!("expected accept, got {decision:?}");
        };
        assert_eq!(draft.posted_by, CHANNEL_POSTER);
        assert_eq!(draft.origin_id, -1001);
        assert_eq!(draft.posted_at, 1_700_000_100);
    }

    #[tokio::test]
    async fn unknown_channel_post_is_dropped() {
        let decision = gate(EmptyChannelPostPolicy::Drop)
            .authorize(&channel_post(-1999, "spam"))
            .await;
        assert!(matches!(decision, Decision::Drop(DropReason::UnknownOrigin)));
    }

    #[rstest]
    #[case(EmptyChannelPostPolicy::Drop, true)]
    #[case(EmptyChannelPostPolicy::Forward, false)]
    #[tokio::test]
    async fn empty_channel_post_follows_policy(
        #[case] policy: EmptyChannelPostPolicy,
        #[case] dropped: bool,
    ) {
        let decision = gate(policy).authorize(&channel_post(-1001, "  ")).await;
        assert_eq!(
            matches!(decision, Decision::Drop(DropReason::EmptyChannelPost)),
            dropped
        );
        assert_eq!(matches!(decision, Decision::Accept(_)), !dropped);
    }

    #[tokio::test]
    async fn commands_are_dropped() {
        let mut event = dm(Some("boss"), "/help");
        event.kind = InboundKind::Command {
            name: "help".into(),
        };
        let decision = gate(EmptyChannelPostPolicy::Drop).authorize(&event).await;
        assert!(matches!(decision, Decision::Drop(DropReason::Command)));
    }

    struct BrokenRegistry;

    #[async_trait]
    impl ChannelRegistry for BrokenRegistry {
        async fn find_by_id(&self, _channel_id: i64) -> herald_channels::Result<Option<Channel>> {
            Err(herald_channels::Error::unavailable("registry offline"))
        }

        async fn list_active(&self) -> herald_channels::Result<Vec<Channel>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn registry_failure_drops_channel_post() {
        let gate = AuthorizationGate::new(
            Arc::new(BrokenRegistry),
            AdminIdentity::parse("boss"),
            EmptyChannelPostPolicy::Drop,
        );
        let decision = gate.authorize(&channel_post(-1001, "hi")).await;
        assert!(matches!(
            decision,
            Decision::Drop(DropReason::RegistryUnavailable)
        ));
    }
}
