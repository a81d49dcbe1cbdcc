use async_trait::async_trait;
use habitual_core::{
    error::BotError,
    message::{Button, Keyboard, PlainText, StructuredAction},
    model::Habit,
};
use tracing::{info, warn};

use super::{back_button, unavailable, user_id};
use crate::i18n::{self, t};
use crate::machine::{
    Capabilities, ConversationState, StateArgs, StateContext, StateTag, Transition,
};

/// Habits listed per page.
pub const PAGE_SIZE: usize = 5;

/// Paged list of the user's habits with progress, edit and delete buttons.
pub struct MyHabitsState {
    habits: Vec<Habit>,
    page: usize,
}

impl MyHabitsState {
    pub fn new() -> Self {
        Self {
            habits: Vec::new(),
            page: 0,
        }
    }

    fn page_count(&self) -> usize {
        self.habits.len().div_ceil(PAGE_SIZE).max(1)
    }

    async fn reload(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        let user = user_id(ctx)?;
        self.habits = ctx
            .backend()
            .habits_for_date(user, None)
            .await
            .map_err(|e| unavailable(ctx, e))?;
        self.page = self.page.min(self.page_count() - 1);
        Ok(())
    }

    fn render(&self, ctx: &StateContext) {
        let lang = ctx.lang();
        if self.habits.is_empty() {
            let keyboard = Keyboard::new().row(vec![back_button(&lang, "my:back")]);
            ctx.messenger()
                .update_main_message(t("no_habits", &lang), Some(keyboard));
            return;
        }

        let pages = self.page_count();
        let mut text = t("my_habits_header", &lang).to_string();
        if pages > 1 {
            text.push_str(&format!("\n{}", i18n::page(&lang, self.page + 1, pages)));
        }

        let mut keyboard = Keyboard::new();
        for habit in self.habits.iter().skip(self.page * PAGE_SIZE).take(PAGE_SIZE) {
            keyboard = keyboard.row(vec![
                Button::new(habit.name.as_str(), format!("my:progress:{}", habit.id)),
                Button::new("✏️", format!("my:edit:{}", habit.id)),
                Button::new("🗑", format!("my:delete:{}", habit.id)),
            ]);
        }

        let mut paging = Vec::new();
        if self.page > 0 {
            paging.push(Button::new(
                t("btn_prev", &lang),
                format!("my:page:{}", self.page - 1),
            ));
        }
        if self.page + 1 < pages {
            paging.push(Button::new(
                t("btn_next", &lang),
                format!("my:page:{}", self.page + 1),
            ));
        }
        keyboard = keyboard
            .row(paging)
            .row(vec![back_button(&lang, "my:back")]);
        ctx.messenger().update_main_message(text, Some(keyboard));
    }
}

impl Default for MyHabitsState {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `<prefix><id>` into an id.
fn id_after(data: &str, prefix: &str) -> Option<i64> {
    data.strip_prefix(prefix)?.parse().ok()
}

#[async_trait]
impl ConversationState for MyHabitsState {
    fn tag(&self) -> StateTag {
        StateTag::MyHabits
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SUSPENDABLE
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        self.reload(ctx).await?;
        self.render(ctx);
        Ok(())
    }

    async fn on_restore(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        self.reload(ctx).await?;
        self.render(ctx);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        ctx: &StateContext,
        action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        let data = action.data.as_str();
        if data == "my:back" {
            return Ok(Transition::end());
        }
        if let Some(id) = id_after(data, "my:progress:") {
            return Ok(Transition::To(StateTag::HabitProgress, StateArgs::habit(id)));
        }
        if let Some(id) = id_after(data, "my:edit:") {
            return Ok(Transition::To(StateTag::EditHabit, StateArgs::habit(id)));
        }
        if let Some(id) = id_after(data, "my:delete:") {
            return Ok(Transition::To(StateTag::DeleteHabit, StateArgs::habit(id)));
        }
        if let Some(page) = data
            .strip_prefix("my:page:")
            .and_then(|p| p.parse::<usize>().ok())
        {
            self.page = page.min(self.page_count() - 1);
        }
        self.render(ctx);
        Ok(Transition::Stay)
    }
}

/// Yes/no confirmation before a habit is removed.
pub struct DeleteHabitState {
    habit_id: Option<i64>,
    found: bool,
}

impl DeleteHabitState {
    pub fn new(habit_id: Option<i64>) -> Self {
        Self {
            habit_id,
            found: false,
        }
    }
}

#[async_trait]
impl ConversationState for DeleteHabitState {
    fn tag(&self) -> StateTag {
        StateTag::DeleteHabit
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        let lang = ctx.lang();
        let habit = match self.habit_id {
            Some(id) => ctx
                .backend()
                .get_habit(id)
                .await
                .map_err(|e| unavailable(ctx, e))?,
            None => None,
        };
        let Some(habit) = habit else {
            warn!("chat {}: habit {:?} not found", ctx.session.chat_id, self.habit_id);
            ctx.messenger()
                .update_main_message(t("habit_not_found", &lang), None);
            return Ok(());
        };
        self.found = true;
        let keyboard = Keyboard::new().row(vec![
            Button::new(t("btn_yes", &lang), "del:yes"),
            Button::new(t("btn_no", &lang), "del:no"),
        ]);
        ctx.messenger()
            .update_main_message(i18n::delete_confirm(&lang, &habit.name), Some(keyboard));
        Ok(())
    }

    async fn handle_action(
        &mut self,
        ctx: &StateContext,
        action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        match (action.data.as_str(), self.habit_id) {
            ("del:yes", Some(id)) if self.found => {
                ctx.backend().delete_habit(id).await?;
                info!("chat {}: deleted habit {id}", ctx.session.chat_id);
                ctx.answer(action, Some(t("habit_deleted", &ctx.lang()))).await;
                Ok(Transition::end())
            }
            ("del:yes" | "del:no", _) => Ok(Transition::end()),
            _ if !self.found => Ok(Transition::end()),
            _ => Ok(Transition::Stay),
        }
    }

    async fn handle_text(
        &mut self,
        _ctx: &StateContext,
        _msg: &PlainText,
    ) -> Result<Transition, BotError> {
        if self.found {
            Ok(Transition::Stay)
        } else {
            Ok(Transition::end())
        }
    }
}
