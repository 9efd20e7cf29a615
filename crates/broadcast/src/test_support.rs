//! Scriptable in-process platform for engine tests.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    Error, Result,
    platform::{BotIdentity, ChatInfo, MemberRole, Platform, SentMessage},
};

#[derive(Debug, Clone)]
struct ChatScript {
    missing: bool,
    role: MemberRole,
    membership_error: bool,
    send_error: bool,
    delay: Duration,
    lookup_delay: Duration,
}

impl Default for ChatScript {
    fn default() -> Self {
        Self {
            missing: false,
            role: MemberRole::Administrator,
            membership_error: false,
            send_error: false,
            delay: Duration::ZERO,
            lookup_delay: Duration::ZERO,
        }
    }
}

/// Every chat is reachable with the bot as administrator unless scripted
/// otherwise.
#[derive(Default)]
pub struct FakePlatform {
    scripts: Mutex<HashMap<i64, ChatScript>>,
    sent: Mutex<Vec<(i64, String)>>,
    membership_checks: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bot() -> BotIdentity {
        BotIdentity {
            id: 4242,
            username: Some("herald_bot".into()),
        }
    }

    fn script(&self, chat_id: i64, f: impl FnOnce(&mut ChatScript)) {
        f(self.scripts.lock().unwrap().entry(chat_id).or_default());
    }

    fn lookup(&self, chat_id: i64) -> ChatScript {
        self.scripts
            .lock()
            .unwrap()
            .get(&chat_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_role(&self, chat_id: i64, role: MemberRole) {
        self.script(chat_id, |s| s.role = role);
    }

    pub fn set_missing(&self, chat_id: i64) {
        self.script(chat_id, |s| s.missing = true);
    }

    pub fn set_membership_error(&self, chat_id: i64) {
        self.script(chat_id, |s| s.membership_error = true);
    }

    pub fn set_send_error(&self, chat_id: i64) {
        self.script(chat_id, |s| s.send_error = true);
    }

    pub fn set_delay(&self, chat_id: i64, delay: Duration) {
        self.script(chat_id, |s| s.delay = delay);
    }

    /// Delay applied to `get_chat` and `get_membership`.
    pub fn set_lookup_delay(&self, chat_id: i64, delay: Duration) {
        self.script(chat_id, |s| s.lookup_delay = delay);
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn membership_checks(&self) -> usize {
        self.membership_checks.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn get_chat(&self, chat_id: i64) -> Result<ChatInfo> {
        let script = self.lookup(chat_id);
        pause(script.lookup_delay).await;
        if script.missing {
            return Err(Error::chat_not_found(chat_id));
        }
        Ok(ChatInfo { id: chat_id })
    }

    async fn get_membership(&self, chat_id: i64, _user_id: u64) -> Result<MemberRole> {
        self.membership_checks.fetch_add(1, Ordering::SeqCst);
        let script = self.lookup(chat_id);
        pause(script.lookup_delay).await;
        if script.membership_error {
            return Err(Error::message("member lookup failed"));
        }
        Ok(script.role)
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<SentMessage> {
        let script = self.lookup(chat_id);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        pause(script.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if script.send_error {
            return Err(Error::message("Forbidden: bot is not a member of the channel chat"));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((chat_id, text.to_string()));
        Ok(SentMessage {
            chat_id,
            message_id: sent.len() as i64,
        })
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
