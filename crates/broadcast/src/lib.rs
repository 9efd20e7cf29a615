//! Broadcast dispatch engine.
//!
//! Authorizes an inbound message, records it as an announcement, fans it out
//! to every active destination channel on a bounded worker pool, and reduces
//! the per-destination outcomes into a single [`DispatchSummary`].
//!
//! The engine only talks to the outside world through injected capabilities:
//! [`herald_channels::ChannelRegistry`], [`herald_announcements::AnnouncementStore`]
//! and [`Platform`].

pub mod broadcaster;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod gate;
pub mod platform;
pub mod report;
#[cfg(test)]
mod test_support;
pub mod validator;

pub use {
    broadcaster::Broadcaster,
    dispatcher::{
        DestinationFailure, DispatchOutcome, DispatchSummary, Dispatcher, FailureReason,
    },
    error::{Error, Result},
    event::{InboundEvent, InboundKind, Sender},
    gate::{AdminIdentity, AuthorizationGate, Decision, DropReason, Rejection},
    platform::{BotIdentity, ChatInfo, MemberRole, Platform, SentMessage},
    validator::DestinationValidator,
};
