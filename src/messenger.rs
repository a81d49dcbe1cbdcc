//! Per-session outbound actor.
//!
//! Keeps one "main" message that is edited in place, tracks ephemeral
//! message ids for later cleanup, and queues main-message updates so call
//! sites never wait on delivery.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use habitual_core::{
    error::{BotError, DeliveryError},
    message::Keyboard,
    traits::Channel,
};
use tracing::{debug, error, warn};

/// A queued rewrite of the main message.
#[derive(Debug, Clone, PartialEq)]
struct MainUpdate {
    text: String,
    keyboard: Option<Keyboard>,
}

#[derive(Debug, Default)]
struct Tracked {
    main_message: Option<i64>,
    received: Vec<i64>,
    sent: Vec<i64>,
}

pub struct Messenger {
    chat_id: i64,
    channel: Arc<dyn Channel>,
    pending: Mutex<VecDeque<MainUpdate>>,
    tracked: tokio::sync::Mutex<Tracked>,
}

impl Messenger {
    pub fn new(chat_id: i64, channel: Arc<dyn Channel>) -> Self {
        Self {
            chat_id,
            channel,
            pending: Mutex::new(VecDeque::new()),
            tracked: tokio::sync::Mutex::new(Tracked::default()),
        }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    /// Queue a rewrite of the main message. Delivery happens on a later
    /// [`process_message`](Self::process_message) call. A still-pending update
    /// is replaced, so only the latest render goes out.
    pub fn update_main_message(&self, text: impl Into<String>, keyboard: Option<Keyboard>) {
        let update = MainUpdate {
            text: text.into(),
            keyboard,
        };
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        match pending.back_mut() {
            Some(last) => *last = update,
            None => pending.push_back(update),
        }
    }

    /// Number of queued, not yet applied updates.
    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Apply at most one queued update. Returns whether anything was applied.
    pub async fn process_message(&self) -> Result<bool, BotError> {
        let next = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        let Some(update) = next else {
            return Ok(false);
        };
        self.apply(update).await?;
        Ok(true)
    }

    async fn apply(&self, update: MainUpdate) -> Result<(), BotError> {
        let mut tracked = self.tracked.lock().await;
        let keyboard = update.keyboard.as_ref();

        let Some(main_id) = tracked.main_message else {
            let id = self
                .channel
                .send_message(self.chat_id, &update.text, keyboard)
                .await?;
            tracked.main_message = Some(id);
            return Ok(());
        };

        match self
            .channel
            .edit_message(self.chat_id, main_id, &update.text, keyboard)
            .await
        {
            Ok(()) | Err(DeliveryError::NotModified) => Ok(()),
            Err(DeliveryError::NotFound) => {
                debug!("chat {}: main message {main_id} gone, sending a new one", self.chat_id);
                tracked.sent.push(main_id);
                tracked.main_message = None;
                let id = self
                    .channel
                    .send_message(self.chat_id, &update.text, keyboard)
                    .await?;
                tracked.main_message = Some(id);
                Ok(())
            }
            Err(e) => {
                error!("chat {}: dropping main message update: {e}", self.chat_id);
                Ok(())
            }
        }
    }

    /// Send a new message right away. The first one becomes the main message.
    pub async fn send_message(
        &self,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, DeliveryError> {
        let mut tracked = self.tracked.lock().await;
        let id = self.channel.send_message(self.chat_id, text, keyboard).await?;
        if tracked.main_message.is_none() {
            tracked.main_message = Some(id);
        } else {
            tracked.sent.push(id);
        }
        Ok(id)
    }

    /// Remember an inbound message for later cleanup.
    pub async fn register_recv_message(&self, message_id: i64) {
        self.tracked.lock().await.received.push(message_id);
    }

    /// Best-effort delete of every tracked message except the main one.
    pub async fn remove_temp_messages(&self) {
        let mut guard = self.tracked.lock().await;
        let tracked = &mut *guard;
        let main = tracked.main_message;
        let ids: Vec<i64> = tracked
            .received
            .drain(..)
            .chain(tracked.sent.drain(..))
            .filter(|id| Some(*id) != main)
            .collect();
        for id in ids {
            if let Err(e) = self.channel.delete_message(self.chat_id, id).await {
                warn!("chat {}: failed to delete message {id}: {e}", self.chat_id);
            }
        }
    }

    pub async fn main_message(&self) -> Option<i64> {
        self.tracked.lock().await.main_message
    }

    pub async fn sent_messages(&self) -> Vec<i64> {
        self.tracked.lock().await.sent.clone()
    }

    pub async fn received_messages(&self) -> Vec<i64> {
        self.tracked.lock().await.received.clone()
    }
}
