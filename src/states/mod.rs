//! Concrete conversation states and the registry that knows them all.

mod habits;
mod idle;
mod init;
mod language;
mod progress;
mod registration;
mod settings;
mod timezone;
mod today;


use habitual_core::error::BotError;
use habitual_core::message::Button;

use crate::i18n::t;
use crate::machine::{StateContext, StateRegistry, StateTag};
use crate::wizard::HabitWizardState;

use habits::{DeleteHabitState, MyHabitsState};
use idle::{HelpState, WaitCommandState};
use init::InitState;
use language::ChooseLanguageState;
use progress::{HabitProgressState, ProgressState};
use registration::RegistrationState;
use settings::SettingsState;
use timezone::ChooseTimezoneState;
use today::TodaysNotificationsState;

/// Every state the bot can be in. `End` stays unregistered.
pub fn registry() -> StateRegistry {
    let mut registry = StateRegistry::new();
    registry.register(StateTag::Init, |_| Box::new(InitState));
    registry.register(StateTag::Registration, |_| {
        Box::new(RegistrationState::new())
    });
    registry.register(StateTag::ChooseLanguage, |_| Box::new(ChooseLanguageState));
    registry.register(StateTag::ChooseTimezone, |_| {
        Box::new(ChooseTimezoneState::new())
    });
    registry.register(StateTag::WaitCommand, |_| Box::new(WaitCommandState));
    registry.register(StateTag::Help, |_| Box::new(HelpState));
    registry.register(StateTag::Settings, |_| Box::new(SettingsState));
    registry.register(StateTag::AddHabit, HabitWizardState::create);
    registry.register(StateTag::EditHabit, HabitWizardState::edit);
    registry.register(StateTag::DeleteHabit, |args| {
        Box::new(DeleteHabitState::new(args.habit_id))
    });
    registry.register(StateTag::MyHabits, |_| Box::new(MyHabitsState::new()));
    registry.register(StateTag::HabitProgress, |args| {
        Box::new(HabitProgressState::new(args.habit_id))
    });
    registry.register(StateTag::TodaysNotifications, |_| {
        Box::new(TodaysNotificationsState::new())
    });
    registry.register(StateTag::Progress, |_| Box::new(ProgressState));
    registry
}

/// Habit service id of the session's user.
fn user_id(ctx: &StateContext) -> Result<i64, BotError> {
    ctx.profile().backend_id.ok_or_else(|| {
        BotError::CollaboratorUnavailable(format!(
            "chat {} has no habit service user",
            ctx.session.chat_id
        ))
    })
}

/// Tell the user the habit service is down while a state loads its data.
/// Returns the error for the caller to propagate.
pub(crate) fn unavailable(ctx: &StateContext, e: BotError) -> BotError {
    ctx.messenger()
        .update_main_message(t("service_unavailable", &ctx.lang()), None);
    e
}

fn back_button(lang: &str, data: &str) -> Button {
    Button::new(t("btn_back", lang), data)
}
