use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    error::{BotError, DeliveryError},
    message::{IncomingEvent, Keyboard, MenuCommand},
    model::{
        Habit, HabitDraft, HabitStatistics, Notification, OverallProgress, User, UserUpdate,
    },
};

/// Messaging gateway: the chat platform the bot talks through.
///
/// Implementations translate platform updates into [`IncomingEvent`]s and
/// report per-call delivery failures as [`DeliveryError`].
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming events.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingEvent>, BotError>;

    /// Send a new message, returning its platform id.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, DeliveryError>;

    /// Replace the text and keyboard of an existing message.
    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), DeliveryError>;

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), DeliveryError>;

    /// Acknowledge a structured action so the client stops its spinner.
    async fn answer_action(&self, _action_id: &str, _text: Option<&str>) -> Result<(), DeliveryError> {
        Ok(())
    }

    /// Publish the command menu for one chat.
    async fn set_commands(
        &self,
        _chat_id: i64,
        _commands: &[MenuCommand],
    ) -> Result<(), DeliveryError> {
        Ok(())
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), BotError>;
}

/// Remote store of users, habits, events, notifications and statistics.
///
/// Lookups return `Ok(None)` when the record does not exist. Transport and
/// server failures map to [`BotError::CollaboratorUnavailable`].
#[async_trait]
pub trait BackendRepository: Send + Sync {
    async fn get_user_by_chat(&self, chat_id: i64) -> Result<Option<User>, BotError>;

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, BotError>;

    /// Create a user linked to a chat identity.
    async fn register_user(
        &self,
        chat_id: i64,
        name: &str,
        language: &str,
        timezone: &str,
    ) -> Result<User, BotError>;

    async fn update_user(&self, update: &UserUpdate) -> Result<User, BotError>;

    async fn get_habit_by_name(&self, user_id: i64, name: &str) -> Result<Option<Habit>, BotError>;

    async fn get_habit(&self, habit_id: i64) -> Result<Option<Habit>, BotError>;

    async fn create_habit(&self, user_id: i64, draft: &HabitDraft) -> Result<Habit, BotError>;

    async fn update_habit(&self, habit_id: i64, draft: &HabitDraft) -> Result<Habit, BotError>;

    async fn delete_habit(&self, habit_id: i64) -> Result<(), BotError>;

    /// Habits scheduled on `date`. With `None`, every habit of the user.
    async fn habits_for_date(
        &self,
        user_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Habit>, BotError>;

    async fn record_habit_event(
        &self,
        habit_id: i64,
        notification_id: Option<i64>,
        at: DateTime<Utc>,
    ) -> Result<(), BotError>;

    async fn habit_notifications(&self, habit_id: i64) -> Result<Vec<Notification>, BotError>;

    /// Replace the notification times of a habit (seconds since midnight UTC).
    async fn create_habit_notifications(
        &self,
        habit_id: i64,
        times: &[i64],
    ) -> Result<Vec<Notification>, BotError>;

    /// Notifications scheduled within `[from, from + span_secs)`.
    async fn notifications_due(
        &self,
        from: DateTime<Utc>,
        span_secs: i64,
    ) -> Result<Vec<Notification>, BotError>;

    /// Today's notifications for a user, as seen from `date` in their timezone.
    async fn todays_notifications(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Notification>, BotError>;

    async fn habit_statistics(
        &self,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<HabitStatistics, BotError>;

    async fn overall_statistics(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<OverallProgress, BotError>;

    async fn health(&self) -> bool;
}
