//! Telegram Bot API wire types.

use serde::{Deserialize, Serialize};

use habitual_core::message::Keyboard;

#[derive(Debug, Deserialize)]
pub(crate) struct TgResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUpdate {
    pub update_id: i64,
    pub message: Option<TgMessage>,
    pub callback_query: Option<TgCallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgMessage {
    pub message_id: i64,
    pub from: Option<TgUser>,
    pub chat: TgChat,
    /// Unix timestamp.
    #[serde(default)]
    pub date: i64,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUser {
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl TgUser {
    pub fn display_name(&self) -> String {
        if let Some(ref un) = self.username {
            format!("@{un}")
        } else if let Some(ref ln) = self.last_name {
            format!("{} {ln}", self.first_name)
        } else {
            self.first_name.clone()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgChat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(default, rename = "type")]
    pub chat_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgCallbackQuery {
    pub id: String,
    pub from: TgUser,
    pub message: Option<TgMessage>,
    pub data: Option<String>,
}

/// The subset of a sent message we care about.
#[derive(Debug, Deserialize)]
pub(crate) struct TgSentMessage {
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct TgInlineKeyboard<'a> {
    pub inline_keyboard: Vec<Vec<TgInlineButton<'a>>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TgInlineButton<'a> {
    pub text: &'a str,
    pub callback_data: &'a str,
}

impl<'a> From<&'a Keyboard> for TgInlineKeyboard<'a> {
    fn from(keyboard: &'a Keyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .filter(|row| !row.is_empty())
                .map(|row| {
                    row.iter()
                        .map(|b| TgInlineButton {
                            text: &b.text,
                            callback_data: &b.data,
                        })
                        .collect()
                })
                .collect(),
        }
    }
}
