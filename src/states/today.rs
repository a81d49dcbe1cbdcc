use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use habitual_core::{
    error::BotError,
    message::{Keyboard, StructuredAction},
    model::Notification,
    time::{format_hhmm, utc_to_local},
};
use tracing::info;

use super::{back_button, unavailable, user_id};
use crate::i18n::t;
use crate::machine::{ConversationState, StateContext, StateTag, Transition};

/// At most this many reminders get a button.
pub const MAX_TODAY_ITEMS: usize = 20;

/// Scheduled first by time, unscheduled last.
fn by_time(a: &Notification, b: &Notification) -> Ordering {
    match (a.time_in_seconds, b.time_in_seconds) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Today's reminders. Tapping one records the habit as done.
pub struct TodaysNotificationsState {
    items: Vec<Notification>,
    /// Names for habits the service did not name inline.
    names: HashMap<i64, String>,
}

impl TodaysNotificationsState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            names: HashMap::new(),
        }
    }

    async fn reload(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        let user = user_id(ctx)?;
        let backend = ctx.backend();
        let mut items = backend
            .todays_notifications(user, ctx.profile().today())
            .await
            .map_err(|e| unavailable(ctx, e))?;
        items.sort_by(by_time);
        items.truncate(MAX_TODAY_ITEMS);

        for item in &items {
            if item.habit_name.is_some() || self.names.contains_key(&item.habit_id) {
                continue;
            }
            if let Ok(Some(habit)) = backend.get_habit(item.habit_id).await {
                self.names.insert(habit.id, habit.name);
            }
        }
        self.items = items;
        Ok(())
    }

    fn label(&self, ctx: &StateContext, item: &Notification) -> String {
        let profile = ctx.profile();
        let lang = profile.language.as_str();
        let when = match item.time() {
            Some(utc) => format_hhmm(utc_to_local(utc, profile.tz(), profile.today())),
            None => t("any_time", lang).to_string(),
        };
        let name = item
            .habit_name
            .as_deref()
            .or_else(|| self.names.get(&item.habit_id).map(String::as_str))
            .unwrap_or(t("your_habit", lang));
        format!("{when} · {name}")
    }

    fn render(&self, ctx: &StateContext) {
        let lang = ctx.lang();
        let text = if self.items.is_empty() {
            t("no_notifications_today", &lang)
        } else {
            t("todays_header", &lang)
        };
        let mut keyboard = Keyboard::new();
        for (idx, item) in self.items.iter().enumerate() {
            keyboard = keyboard.button(self.label(ctx, item), format!("today:{idx}"));
        }
        keyboard = keyboard.row(vec![back_button(&lang, "today:back")]);
        ctx.messenger().update_main_message(text, Some(keyboard));
    }
}

impl Default for TodaysNotificationsState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationState for TodaysNotificationsState {
    fn tag(&self) -> StateTag {
        StateTag::TodaysNotifications
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        self.reload(ctx).await?;
        self.render(ctx);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        ctx: &StateContext,
        action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        if action.data == "today:back" {
            return Ok(Transition::end());
        }
        let picked = action
            .data
            .strip_prefix("today:")
            .and_then(|i| i.parse::<usize>().ok())
            .and_then(|i| self.items.get(i).cloned());
        if let Some(item) = picked {
            ctx.backend()
                .record_habit_event(item.habit_id, item.notification_id, Utc::now())
                .await?;
            info!(
                "chat {}: habit {} marked done",
                ctx.session.chat_id, item.habit_id
            );
            ctx.answer(action, Some(t("marked_done", &ctx.lang()))).await;
            self.reload(ctx).await?;
        }
        self.render(ctx);
        Ok(Transition::Stay)
    }
}
