use async_trait::async_trait;
use habitual_core::{
    error::BotError,
    message::{Keyboard, StructuredAction},
};

use super::{back_button, unavailable, user_id};
use crate::i18n::{self, t};
use crate::machine::{ConversationState, StateContext, StateTag, Transition};

fn back_keyboard(lang: &str) -> Keyboard {
    Keyboard::new().row(vec![back_button(lang, "progress:back")])
}

fn on_back(action: &StructuredAction) -> Transition {
    if action.data == "progress:back" {
        Transition::end()
    } else {
        Transition::Stay
    }
}

/// Statistics of a single habit.
pub struct HabitProgressState {
    habit_id: Option<i64>,
}

impl HabitProgressState {
    pub fn new(habit_id: Option<i64>) -> Self {
        Self { habit_id }
    }
}

#[async_trait]
impl ConversationState for HabitProgressState {
    fn tag(&self) -> StateTag {
        StateTag::HabitProgress
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        let lang = ctx.lang();
        let backend = ctx.backend();
        let habit = match self.habit_id {
            Some(id) => backend.get_habit(id).await.map_err(|e| unavailable(ctx, e))?,
            None => None,
        };
        let text = match habit {
            Some(habit) => {
                let stats = backend
                    .habit_statistics(habit.id, ctx.profile().today())
                    .await
                    .map_err(|e| unavailable(ctx, e))?;
                i18n::habit_progress(&lang, &habit.name, &stats)
            }
            None => t("habit_not_found", &lang).to_string(),
        };
        ctx.messenger()
            .update_main_message(text, Some(back_keyboard(&lang)));
        Ok(())
    }

    async fn handle_action(
        &mut self,
        _ctx: &StateContext,
        action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        Ok(on_back(action))
    }
}

/// Statistics across all habits, with a tagline that changes daily.
pub struct ProgressState;

#[async_trait]
impl ConversationState for ProgressState {
    fn tag(&self) -> StateTag {
        StateTag::Progress
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        let lang = ctx.lang();
        let today = ctx.profile().today();
        let user = user_id(ctx)?;
        let progress = ctx
            .backend()
            .overall_statistics(user, today)
            .await
            .map_err(|e| unavailable(ctx, e))?;
        ctx.messenger().update_main_message(
            i18n::progress(&lang, &progress, today),
            Some(back_keyboard(&lang)),
        );
        Ok(())
    }

    async fn handle_action(
        &mut self,
        _ctx: &StateContext,
        action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        Ok(on_back(action))
    }
}
