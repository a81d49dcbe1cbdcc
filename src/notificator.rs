//! Periodic poller that pushes due habit reminders.
//!
//! Each cycle fetches a window that overlaps the previous one by `overlap`
//! seconds, so a reminder can show up in two consecutive fetches. Keys sent
//! in the previous cycle suppress that second copy. This holds only while
//! `overlap < period`: a reminder seen by three cycles is sent twice.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use habitual_core::{
    error::BotError,
    model::Notification,
    time::{format_hhmm, local_date, utc_to_local},
    traits::BackendRepository,
};
use tracing::{debug, error, info, warn};

use crate::i18n::{self, t};
use crate::session::SessionRegistry;

/// Identity of one reminder occurrence: user, habit, notification, time.
/// Missing parts are `-1`.
pub type DedupKey = (i64, i64, i64, i64);

pub fn dedup_key(n: &Notification) -> DedupKey {
    (
        n.user_id.unwrap_or(-1),
        n.habit_id,
        n.notification_id.unwrap_or(-1),
        n.time_in_seconds.unwrap_or(-1),
    )
}

#[derive(Default)]
struct Memory {
    /// Keys attempted in the last cycle.
    sent: HashSet<DedupKey>,
    /// Backend user id to chat id, kept for the process lifetime.
    chats: HashMap<i64, i64>,
    habit_names: HashMap<i64, String>,
}

pub struct Notificator {
    backend: Arc<dyn BackendRepository>,
    sessions: Arc<SessionRegistry>,
    period_secs: i64,
    overlap_secs: i64,
    memory: tokio::sync::Mutex<Memory>,
    stopped: AtomicBool,
}

impl Notificator {
    pub fn new(
        backend: Arc<dyn BackendRepository>,
        sessions: Arc<SessionRegistry>,
        period_secs: u64,
        overlap_secs: u64,
    ) -> Self {
        if overlap_secs >= period_secs {
            warn!(
                "notificator overlap {overlap_secs}s is not below period {period_secs}s, \
                 reminders may be sent twice"
            );
        }
        Self {
            backend,
            sessions,
            period_secs: period_secs as i64,
            overlap_secs: overlap_secs as i64,
            memory: tokio::sync::Mutex::new(Memory::default()),
            stopped: AtomicBool::new(false),
        }
    }

    /// Fetch and dispatch one window ending around `now + period`.
    /// Returns how many reminders were delivered.
    pub async fn cycle(&self, now: DateTime<Utc>) -> usize {
        let from = now - chrono::Duration::seconds(self.overlap_secs);
        let span = self.period_secs + self.overlap_secs;
        let due = match self.backend.notifications_due(from, span).await {
            Ok(due) => due,
            Err(e) => {
                error!("notificator: fetching due reminders failed: {e}");
                return 0;
            }
        };

        let mut memory = self.memory.lock().await;
        let previous = std::mem::take(&mut memory.sent);
        let mut delivered = 0;
        for notification in &due {
            let key = dedup_key(notification);
            if previous.contains(&key) || memory.sent.contains(&key) {
                debug!("notificator: skipping already sent {key:?}");
                continue;
            }
            match self.deliver(&mut memory, notification, now).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!(
                    "notificator: reminder for habit {} failed: {e}",
                    notification.habit_id
                ),
            }
            memory.sent.insert(key);
        }
        if delivered > 0 {
            info!("notificator: delivered {delivered} of {} due reminders", due.len());
        }
        delivered
    }

    async fn deliver(
        &self,
        memory: &mut Memory,
        notification: &Notification,
        now: DateTime<Utc>,
    ) -> Result<(), BotError> {
        let user_id = notification.user_id.ok_or_else(|| {
            BotError::CollaboratorUnavailable("reminder without a user".into())
        })?;
        let chat_id = self.chat_for(memory, user_id).await?;
        let habit_name = self.habit_name(memory, notification).await;

        let session = self.sessions.get_or_create(chat_id)?;
        self.sessions.setup(&session).await?;
        let profile = session.profile();
        let lang = profile.language.as_str();

        let time = match notification.time() {
            Some(utc) => {
                let tz = profile.tz();
                format_hhmm(utc_to_local(utc, tz, local_date(tz, now)))
            }
            None => t("any_time", lang).to_string(),
        };
        let name = habit_name.as_deref().unwrap_or(t("your_habit", lang));
        let text = i18n::reminder(lang, name, &time);
        session.messenger.send_message(&text, None).await?;
        Ok(())
    }

    async fn chat_for(&self, memory: &mut Memory, user_id: i64) -> Result<i64, BotError> {
        if let Some(chat) = memory.chats.get(&user_id) {
            return Ok(*chat);
        }
        let chat = self
            .backend
            .get_user(user_id)
            .await?
            .and_then(|u| u.chat_id())
            .ok_or_else(|| {
                BotError::CollaboratorUnavailable(format!("user {user_id} has no chat"))
            })?;
        memory.chats.insert(user_id, chat);
        Ok(chat)
    }

    /// Inline name, cached name, or a lookup. `None` if all fail.
    async fn habit_name(&self, memory: &mut Memory, n: &Notification) -> Option<String> {
        if let Some(ref name) = n.habit_name {
            return Some(name.clone());
        }
        if let Some(name) = memory.habit_names.get(&n.habit_id) {
            return Some(name.clone());
        }
        match self.backend.get_habit(n.habit_id).await {
            Ok(Some(habit)) => {
                memory.habit_names.insert(n.habit_id, habit.name.clone());
                Some(habit.name)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("notificator: habit {} lookup failed: {e}", n.habit_id);
                None
            }
        }
    }

    /// Poll until [`stop`](Self::stop) is called.
    pub async fn run(self: Arc<Self>) {
        info!(
            "notificator started (period {}s, overlap {}s)",
            self.period_secs, self.overlap_secs
        );
        let period = Duration::from_secs(self.period_secs.max(1) as u64);
        while !self.stopped.load(Ordering::Relaxed) {
            self.cycle(Utc::now()).await;
            tokio::time::sleep(period).await;
        }
        info!("notificator stopped");
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }
}
