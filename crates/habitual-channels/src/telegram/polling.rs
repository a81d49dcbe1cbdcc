//! Long-polling update loop and Channel trait implementation.

use super::types::{TgResponse, TgUpdate};
use super::TelegramChannel;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use habitual_core::{
    error::{BotError, DeliveryError},
    message::{ContentType, IncomingEvent, Keyboard, MenuCommand, PlainText, StructuredAction},
    traits::Channel,
};
use std::sync::atomic::Ordering;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingEvent>, BotError> {
        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let last_update_id = self.last_update_id.clone();
        let stopped = self.stopped.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            while !stopped.load(Ordering::Relaxed) {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut url = format!("{base_url}/getUpdates?timeout=30");
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let resp = match client
                    .get(&url)
                    .timeout(std::time::Duration::from_secs(35))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    let Some(event) = update_to_event(update) else {
                        continue;
                    };
                    if tx.send(event).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
            info!("telegram polling stopped");
        });

        Ok(rx)
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, DeliveryError> {
        self.send_text(chat_id, text, keyboard).await
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), DeliveryError> {
        self.edit_text(chat_id, message_id, text, keyboard).await
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), DeliveryError> {
        self.delete(chat_id, message_id).await
    }

    async fn answer_action(&self, action_id: &str, text: Option<&str>) -> Result<(), DeliveryError> {
        self.answer_callback(action_id, text).await
    }

    async fn set_commands(
        &self,
        chat_id: i64,
        commands: &[MenuCommand],
    ) -> Result<(), DeliveryError> {
        self.register_commands(chat_id, commands).await
    }

    async fn stop(&self) -> Result<(), BotError> {
        self.stopped.store(true, Ordering::Relaxed);
        info!("Telegram channel stopped");
        Ok(())
    }
}

/// Translate a raw update into an inbound event.
///
/// Group chats and updates without a sender are dropped.
pub(crate) fn update_to_event(update: TgUpdate) -> Option<IncomingEvent> {
    if let Some(query) = update.callback_query {
        let message = query.message?;
        if is_group(&message.chat.chat_type) {
            debug!("telegram: ignoring group callback from chat {}", message.chat.id);
            return None;
        }
        return Some(IncomingEvent::Action(StructuredAction {
            id: query.id,
            chat_id: message.chat.id,
            sender_name: Some(query.from.display_name()),
            data: query.data.unwrap_or_default(),
            timestamp: Utc::now(),
        }));
    }

    let msg = update.message?;
    let user = msg.from?;

    // Drop group messages, the bot only talks person-to-person.
    if is_group(&msg.chat.chat_type) {
        debug!("telegram: ignoring group message from chat {}", msg.chat.id);
        return None;
    }

    let (text, content_type) = match msg.text {
        Some(t) => (t, ContentType::Text),
        None => (String::new(), ContentType::Other),
    };

    Some(IncomingEvent::Text(PlainText {
        chat_id: msg.chat.id,
        message_id: msg.message_id,
        sender_name: Some(user.display_name()),
        text,
        content_type,
        timestamp: DateTime::from_timestamp(msg.date, 0).unwrap_or_else(Utc::now),
    }))
}

fn is_group(chat_type: &str) -> bool {
    matches!(chat_type, "group" | "supergroup")
}
