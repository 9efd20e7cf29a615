use std::sync::Arc;

use {
    herald_announcements::AnnouncementStore,
    herald_channels::ChannelRegistry,
    herald_config::BroadcastConfig,
    tracing::{debug, info, warn},
};

use crate::{
    dispatcher::{DispatchOutcome, Dispatcher},
    event::InboundEvent,
    gate::{AdminIdentity, AuthorizationGate, Decision},
    platform::{BotIdentity, Platform},
};

/// Entry point for decoded inbound events: authorizes, dispatches and
/// reports back to the originator.
pub struct Broadcaster {
    gate: AuthorizationGate,
    dispatcher: Dispatcher,
    platform: Arc<dyn Platform>,
    report_channel_posts: bool,
}

impl Broadcaster {
    pub fn new(
        registry: Arc<dyn ChannelRegistry>,
        announcements: Arc<dyn AnnouncementStore>,
        platform: Arc<dyn Platform>,
        bot: BotIdentity,
        admin: AdminIdentity,
        config: BroadcastConfig,
    ) -> Self {
        let gate = AuthorizationGate::new(
            Arc::clone(&registry),
            admin,
            config.empty_channel_post_policy,
        );
        let report_channel_posts = config.report_channel_posts;
        let dispatcher = Dispatcher::new(
            registry,
            announcements,
            Arc::clone(&platform),
            bot,
            config,
        );
        Self {
            gate,
            dispatcher,
            platform,
            report_channel_posts,
        }
    }

    /// Handle one inbound event to completion. Never fails; the returned
    /// outcome describes what happened.
    pub async fn handle(&self, event: &InboundEvent) -> DispatchOutcome {
        let outcome = match self.gate.authorize(event).await {
            Decision::Drop(reason) => {
                debug!(origin_id = event.origin_id, %reason, "inbound event dropped");
                return DispatchOutcome::Dropped(reason);
            },
            Decision::Reject(rejection) => {
                info!(origin_id = event.origin_id, %rejection, "announcement rejected");
                DispatchOutcome::Rejected(rejection)
            },
            Decision::Accept(draft) => self.dispatcher.dispatch(draft).await,
        };

        if let Some(text) = outcome.reply_text() {
            self.report(event, &text).await;
        }
        outcome
    }

    async fn report(&self, event: &InboundEvent, text: &str) {
        if !event.is_direct_message() && !self.report_channel_posts {
            info!(origin_id = event.origin_id, report = %text, "channel post dispatched");
            return;
        }
        if let Err(e) = self.platform.send_message(event.origin_id, text).await {
            warn!(origin_id = event.origin_id, error = %e, "failed to deliver report");
        }
    }
}
