use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inbound event from a messaging channel.
///
/// Every conversation state dispatches on this closed two-variant set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IncomingEvent {
    Text(PlainText),
    Action(StructuredAction),
}

impl IncomingEvent {
    /// Chat the event belongs to.
    pub fn chat_id(&self) -> i64 {
        match self {
            Self::Text(t) => t.chat_id,
            Self::Action(a) => a.chat_id,
        }
    }

    /// Human-readable sender name, if the platform provided one.
    pub fn sender_name(&self) -> Option<&str> {
        match self {
            Self::Text(t) => t.sender_name.as_deref(),
            Self::Action(a) => a.sender_name.as_deref(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Text(t) => t.timestamp,
            Self::Action(a) => a.timestamp,
        }
    }
}

/// A plain message typed by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlainText {
    pub chat_id: i64,
    /// Platform message id, used for later cleanup.
    pub message_id: i64,
    pub sender_name: Option<String>,
    pub text: String,
    pub content_type: ContentType,
    pub timestamp: DateTime<Utc>,
}

/// What kind of content a plain message carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    Text,
    Other,
}

/// A button press on an inline keyboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredAction {
    /// Platform id of the action, needed to acknowledge it.
    pub id: String,
    pub chat_id: i64,
    pub sender_name: Option<String>,
    /// Opaque payload attached to the pressed button.
    pub data: String,
    pub timestamp: DateTime<Utc>,
}

/// Inline keyboard attached to an outgoing message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row holding a single button.
    pub fn button(mut self, text: impl Into<String>, data: impl Into<String>) -> Self {
        self.rows.push(vec![Button::new(text, data)]);
        self
    }

    /// Append a row of buttons.
    pub fn row(mut self, row: Vec<Button>) -> Self {
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.is_empty())
    }

    /// All button payloads, row by row.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(|b| b.data.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    pub data: String,
}

impl Button {
    pub fn new(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }
}

/// An entry of the command menu a chat client shows next to the input box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCommand {
    /// Command without the leading slash.
    pub command: String,
    pub description: String,
}
