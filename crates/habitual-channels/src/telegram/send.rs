//! Outbound Bot API calls and error classification.

use super::types::{TgInlineKeyboard, TgResponse, TgSentMessage};
use super::TelegramChannel;
use habitual_core::{
    error::DeliveryError,
    message::{Keyboard, MenuCommand},
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Bot API hard limit on message text, in characters.
pub(crate) const MAX_TEXT_CHARS: usize = 4096;

impl TelegramChannel {
    /// POST a Bot API method and decode its `result`.
    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T, DeliveryError> {
        let url = format!("{}/{method}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Other(format!("telegram {method} failed: {e}")))?;

        let body: TgResponse<T> = resp
            .json()
            .await
            .map_err(|e| DeliveryError::Other(format!("telegram {method} parse failed: {e}")))?;

        if !body.ok {
            return Err(classify_error(&body.description.unwrap_or_default()));
        }
        body.result
            .ok_or_else(|| DeliveryError::Other(format!("telegram {method} returned no result")))
    }

    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, DeliveryError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": truncate_text(text, MAX_TEXT_CHARS),
        });
        attach_keyboard(&mut body, keyboard);
        let sent: TgSentMessage = self.call("sendMessage", &body).await?;
        Ok(sent.message_id)
    }

    pub(crate) async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), DeliveryError> {
        let mut body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": truncate_text(text, MAX_TEXT_CHARS),
        });
        attach_keyboard(&mut body, keyboard);
        // Result is the edited message, or `true` for inline messages.
        let _: Value = self.call("editMessageText", &body).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), DeliveryError> {
        let body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });
        let _: bool = self.call("deleteMessage", &body).await?;
        Ok(())
    }

    pub(crate) async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), DeliveryError> {
        let mut body = json!({ "callback_query_id": callback_id });
        if let Some(text) = text {
            body["text"] = json!(text);
        }
        let _: bool = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }

    /// Register the per-chat command menu so users see an autocomplete list.
    pub(crate) async fn register_commands(
        &self,
        chat_id: i64,
        commands: &[MenuCommand],
    ) -> Result<(), DeliveryError> {
        let body = json!({
            "commands": commands,
            "scope": { "type": "chat", "chat_id": chat_id },
        });
        match self.call::<bool>("setMyCommands", &body).await {
            Ok(_) => {
                info!("registered Telegram bot commands for chat {chat_id}");
                Ok(())
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
                Err(e)
            }
        }
    }
}

fn attach_keyboard(body: &mut Value, keyboard: Option<&Keyboard>) {
    if let Some(kb) = keyboard.filter(|kb| !kb.is_empty()) {
        body["reply_markup"] = json!(TgInlineKeyboard::from(kb));
    }
}

/// Map a Bot API error description onto a delivery failure kind.
pub(crate) fn classify_error(description: &str) -> DeliveryError {
    let lower = description.to_lowercase();
    if lower.contains("message is not modified") {
        DeliveryError::NotModified
    } else if lower.contains("message to edit not found")
        || lower.contains("message to delete not found")
        || lower.contains("message can't be edited")
    {
        DeliveryError::NotFound
    } else {
        DeliveryError::Other(description.to_string())
    }
}

/// Cut text to at most `max_chars` characters.
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
