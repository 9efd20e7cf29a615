//! Fan-out of a single announcement to every active destination.

use std::{sync::Arc, time::Duration};

use {
    herald_announcements::{AnnouncementStore, NewAnnouncement},
    herald_channels::{Channel, ChannelRegistry},
    herald_config::{BroadcastConfig, PublishPolicy},
    tokio::{
        sync::Semaphore,
        task::JoinSet,
        time::{Instant, timeout, timeout_at},
    },
    tracing::{debug, error, info, warn},
};

use crate::{
    gate::{DropReason, Rejection},
    platform::{BotIdentity, Platform},
    report,
    validator::DestinationValidator,
};

const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Why a single destination did not receive the announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The platform no longer knows the chat.
    Unreachable(String),
    /// The bot is not an administrator of the chat.
    InsufficientPrivilege(String),
    SendFailed(String),
    /// The per-destination timeout or the pass deadline elapsed.
    TimedOut,
    /// The delivery task died without reporting.
    Internal(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreachable(e) => write!(f, "unreachable: {e}"),
            Self::InsufficientPrivilege(e) => write!(f, "insufficient privilege: {e}"),
            Self::SendFailed(e) => write!(f, "send failed: {e}"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Internal(e) => write!(f, "internal: {e}"),
        }
    }
}

#[cfg(feature = "metrics")]
impl FailureReason {
    fn label(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::InsufficientPrivilege(_) => "insufficient_privilege",
            Self::SendFailed(_) => "send_failed",
            Self::TimedOut => "timed_out",
            Self::Internal(_) => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationFailure {
    pub channel_id: i64,
    pub channel_name: String,
    pub reason: FailureReason,
}

/// Result of one complete dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    pub announcement_id: i64,
    pub success_count: usize,
    /// Destinations attempted, after excluding the origin chat.
    pub total_considered: usize,
    /// In registry order.
    pub failures: Vec<DestinationFailure>,
    pub published: bool,
}

impl DispatchSummary {
    pub fn failed_channel_names(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.channel_name.as_str())
    }
}

/// Terminal state of handling one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dropped(DropReason),
    Rejected(Rejection),
    StoreFailed,
    RegistryFailed { announcement_id: i64 },
    NoDestinations { announcement_id: i64 },
    Completed(DispatchSummary),
}

impl DispatchOutcome {
    /// Reply for the originator, if this outcome warrants one.
    #[must_use]
    pub fn reply_text(&self) -> Option<String> {
        match self {
            Self::Dropped(_) => None,
            Self::Rejected(rejection) => Some(rejection.reply_text().to_string()),
            Self::StoreFailed => Some(report::STORE_FAILED.to_string()),
            Self::RegistryFailed { .. } => Some(report::REGISTRY_FAILED.to_string()),
            Self::NoDestinations { .. } => Some(report::NO_DESTINATIONS.to_string()),
            Self::Completed(summary) => Some(report::summary_text(summary)),
        }
    }
}

pub struct Dispatcher {
    registry: Arc<dyn ChannelRegistry>,
    announcements: Arc<dyn AnnouncementStore>,
    platform: Arc<dyn Platform>,
    validator: DestinationValidator,
    config: BroadcastConfig,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<dyn ChannelRegistry>,
        announcements: Arc<dyn AnnouncementStore>,
        platform: Arc<dyn Platform>,
        bot: BotIdentity,
        config: BroadcastConfig,
    ) -> Self {
        let validator = DestinationValidator::new(Arc::clone(&platform), bot);
        Self {
            registry,
            announcements,
            platform,
            validator,
            config,
        }
    }

    /// Persist the announcement, deliver it to every active channel except
    /// its origin, then reconcile the publication flag.
    pub async fn dispatch(&self, draft: NewAnnouncement) -> DispatchOutcome {
        let origin_id = draft.origin_id;
        let text: Arc<str> = Arc::from(draft.text.as_str());

        let announcement_id = match self.announcements.create(draft).await {
            Ok(id) => id,
            Err(e) => {
                error!(origin_id, error = %e, "failed to store announcement");
                return DispatchOutcome::StoreFailed;
            },
        };

        let channels = match self.registry.list_active().await {
            Ok(channels) => channels,
            Err(e) => {
                error!(announcement_id, error = %e, "failed to load active channels");
                return DispatchOutcome::RegistryFailed { announcement_id };
            },
        };
        if channels.is_empty() {
            info!(announcement_id, "no active channels");
            return DispatchOutcome::NoDestinations { announcement_id };
        }

        let destinations: Vec<Channel> = channels
            .into_iter()
            .filter(|c| c.channel_id != origin_id)
            .collect();
        let results = self.fan_out(announcement_id, &destinations, text).await;

        let mut success_count = 0;
        let mut failures = Vec::new();
        for (channel, result) in destinations.iter().zip(results) {
            match result {
                Ok(()) => success_count += 1,
                Err(reason) => {
                    warn!(
                        announcement_id,
                        channel_id = channel.channel_id,
                        channel = %channel.display_name,
                        reason = %reason,
                        "delivery failed"
                    );
                    #[cfg(feature = "metrics")]
                    metrics::counter!("herald_broadcast_failures_total", "reason" => reason.label())
                        .increment(1);
                    failures.push(DestinationFailure {
                        channel_id: channel.channel_id,
                        channel_name: channel.display_name.clone(),
                        reason,
                    });
                },
            }
        }

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("herald_broadcast_passes_total").increment(1);
            metrics::counter!("herald_broadcast_deliveries_total").increment(success_count as u64);
        }

        let published = self.reconcile(announcement_id, success_count).await;
        info!(
            announcement_id,
            success_count,
            total = destinations.len(),
            failed = failures.len(),
            published,
            "dispatch pass complete"
        );

        DispatchOutcome::Completed(DispatchSummary {
            announcement_id,
            success_count,
            total_considered: destinations.len(),
            failures,
            published,
        })
    }

    /// Run validate+send for every destination on a bounded pool. Results come
    /// back in destination order.
    async fn fan_out(
        &self,
        announcement_id: i64,
        destinations: &[Channel],
        text: Arc<str>,
    ) -> Vec<Result<(), FailureReason>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let per_destination = self.config.destination_timeout();
        let deadline = pass_deadline_from(Instant::now(), self.config.pass_deadline());
        let mut tasks = JoinSet::new();

        for (index, channel) in destinations.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let validator = self.validator.clone();
            let platform = Arc::clone(&self.platform);
            let text = Arc::clone(&text);
            let chat_id = channel.channel_id;
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        match timeout(
                            per_destination,
                            deliver(&validator, platform.as_ref(), chat_id, &text),
                        )
                        .await
                        {
                            Ok(result) => result,
                            Err(_) => Err(FailureReason::TimedOut),
                        }
                    },
                    Err(e) => Err(FailureReason::Internal(e.to_string())),
                };
                (index, result)
            });
        }

        let mut results: Vec<Option<Result<(), FailureReason>>> = vec![None; destinations.len()];
        let mut deadline_hit = false;
        loop {
            match timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok((index, result)))) => {
                    if let Some(slot) = results.get_mut(index) {
                        *slot = Some(result);
                    }
                },
                Ok(Some(Err(e))) => {
                    error!(announcement_id, error = %e, "delivery task failed");
                },
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        announcement_id,
                        pending = tasks.len(),
                        "pass deadline elapsed, aborting pending deliveries"
                    );
                    tasks.abort_all();
                    deadline_hit = true;
                    break;
                },
            }
        }

        results
            .into_iter()
            .map(|slot| match slot {
                Some(result) => result,
                None if deadline_hit => Err(FailureReason::TimedOut),
                None => Err(FailureReason::Internal("delivery task failed".into())),
            })
            .collect()
    }

    async fn reconcile(&self, announcement_id: i64, success_count: usize) -> bool {
        let should_publish = match self.config.publish_policy {
            PublishPolicy::Always => true,
            PublishPolicy::OnSuccess => success_count > 0,
        };
        if !should_publish {
            debug!(announcement_id, "nothing delivered, leaving unpublished");
            return false;
        }
        match self.announcements.mark_published(announcement_id).await {
            Ok(true) => true,
            Ok(false) => {
                debug!(announcement_id, "announcement already published");
                true
            },
            Err(e) => {
                error!(announcement_id, error = %e, "failed to mark announcement published");
                false
            },
        }
    }
}

/// Deadline for a whole pass. A limit too large for `Instant` falls back to
/// a far-future deadline.
fn pass_deadline_from(start: Instant, limit: Duration) -> Instant {
    start
        .checked_add(limit)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

async fn deliver(
    validator: &DestinationValidator,
    platform: &dyn Platform,
    chat_id: i64,
    text: &str,
) -> Result<(), FailureReason> {
    validator.validate(chat_id).await?;
    platform
        .send_message(chat_id, text)
        .await
        .map_err(|e| FailureReason::SendFailed(e.to_string()))?;
    debug!(chat_id, "delivered");
    Ok(())
}
