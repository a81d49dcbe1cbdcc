//! The habit wizard: one outer conversation state driving a chain of fields.
//!
//! The same state serves creation and editing. Every accepted input advances
//! the cursor and re-renders a summary of the whole draft; rejected input
//! leaves the cursor in place and shows an error banner.

mod fields;
mod render;


use fields::{Field, FieldError};
use render::WizardView;

use async_trait::async_trait;
use habitual_core::{
    error::BotError,
    message::{PlainText, StructuredAction},
    model::HabitDraft,
    traits::BackendRepository,
};
use tracing::{info, warn};

use crate::i18n::{self, t};
use crate::machine::{
    Capabilities, ConversationState, StateArgs, StateContext, StateTag, Transition,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit { habit_id: i64 },
}

pub struct HabitWizardState {
    mode: WizardMode,
    draft: HabitDraft,
    cursor: Field,
    banner: Option<String>,
    /// Set when the habit being edited is gone or could not be loaded.
    /// Any input then ends the wizard.
    missing: bool,
}

impl HabitWizardState {
    pub fn new(mode: WizardMode) -> Self {
        Self {
            mode,
            draft: HabitDraft::default(),
            cursor: Field::Name,
            banner: None,
            missing: false,
        }
    }

    /// Registry constructor for `AddHabit`.
    pub fn create(_args: StateArgs) -> Box<dyn ConversationState> {
        Box::new(Self::new(WizardMode::Create))
    }

    /// Registry constructor for `EditHabit`. Without a habit id the wizard
    /// reports the habit as missing.
    pub fn edit(args: StateArgs) -> Box<dyn ConversationState> {
        match args.habit_id {
            Some(habit_id) => Box::new(Self::new(WizardMode::Edit { habit_id })),
            None => {
                let mut state = Self::new(WizardMode::Edit { habit_id: -1 });
                state.missing = true;
                Box::new(state)
            }
        }
    }

    fn render(&self, ctx: &StateContext) {
        let profile = ctx.profile();
        let lang = profile.language.clone();
        let header = match self.mode {
            WizardMode::Create => t("wizard_create_header", &lang),
            WizardMode::Edit { .. } => t("wizard_edit_header", &lang),
        };
        let view = WizardView {
            header,
            draft: &self.draft,
            cursor: self.cursor,
            banner: self.banner.as_deref(),
            lang: &lang,
            tz: profile.tz(),
            today: profile.today(),
        };
        let (text, keyboard) = view.render();
        ctx.messenger().update_main_message(text, Some(keyboard));
    }

    fn show_missing(&self, ctx: &StateContext) {
        ctx.messenger()
            .update_main_message(t("habit_not_found", &ctx.lang()), None);
    }

    /// Run an input step: clear the banner, apply, and show the outcome.
    /// Validation failures become the banner; anything else propagates.
    fn settle(&mut self, ctx: &StateContext, outcome: Result<(), BotError>) -> Result<(), BotError> {
        match outcome {
            Ok(()) => {
                self.banner = None;
                self.render(ctx);
                Ok(())
            }
            Err(BotError::ValidationFailed(message)) => {
                self.banner = Some(message);
                self.render(ctx);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn apply_text(&mut self, ctx: &StateContext, input: &str) -> Result<(), BotError> {
        let lang = ctx.lang();
        let limits = ctx.limits().clone();
        let profile = ctx.profile();

        self.cursor = match self.cursor {
            Field::Name => {
                let name = fields::parse_name(input, limits.max_name_len)
                    .map_err(|e| e.into_error(&lang))?;
                self.ensure_unique(ctx, &name).await?;
                self.draft.name = Some(name);
                Field::Name.next()
            }
            Field::Description => {
                let text = fields::parse_description(input, limits.max_description_len)
                    .map_err(|e| e.into_error(&lang))?;
                self.draft.description = Some(text);
                Field::Description.next()
            }
            Field::TimesPerDay => {
                let n = fields::parse_times_per_day(input, &self.draft)
                    .map_err(|e| e.into_error(&lang))?;
                self.draft.times_per_day = Some(n);
                Field::TimesPerDay.next()
            }
            Field::StartDate => {
                let date = fields::parse_start_date(input, profile.today(), &self.draft)
                    .map_err(|e| e.into_error(&lang))?;
                self.draft.start_date = Some(date);
                Field::StartDate.next()
            }
            Field::EndDate => {
                let date = fields::parse_end_date(input, profile.today(), &self.draft)
                    .map_err(|e| e.into_error(&lang))?;
                self.draft.end_date = Some(date);
                Field::EndDate.next()
            }
            Field::Notifications => {
                fields::add_notification(
                    &mut self.draft,
                    input,
                    profile.tz(),
                    profile.today(),
                    limits.max_notifications,
                )
                .map_err(|e| e.into_error(&lang))?;
                Field::Notifications
            }
            Field::Recurrence { .. } => return Err(FieldError::UseButtons.into_error(&lang)),
        };
        Ok(())
    }

    /// A habit with the same name must not exist, other than the one edited.
    async fn ensure_unique(&self, ctx: &StateContext, name: &str) -> Result<(), BotError> {
        let Some(user_id) = ctx.profile().backend_id else {
            return Ok(());
        };
        let existing = ctx.backend().get_habit_by_name(user_id, name).await?;
        match (existing, self.mode) {
            (None, _) => Ok(()),
            (Some(habit), WizardMode::Edit { habit_id }) if habit.id == habit_id => Ok(()),
            (Some(_), _) => Err(FieldError::NameTaken.into_error(&ctx.lang())),
        }
    }

    fn apply_field_action(&mut self, ctx: &StateContext, data: &str) -> Result<(), BotError> {
        let lang = ctx.lang();
        let next = match self.cursor {
            Field::Recurrence { picking_days } => {
                fields::apply_recurrence_action(&mut self.draft, picking_days, data)
            }
            Field::Notifications => fields::apply_notification_action(&mut self.draft, data),
            _ => Err(FieldError::UseButtons),
        };
        self.cursor = next.map_err(|e| e.into_error(&lang))?;
        Ok(())
    }

    async fn submit(&mut self, ctx: &StateContext) -> Result<Transition, BotError> {
        let lang = ctx.lang();
        let Some(name) = self.draft.name.clone() else {
            self.settle(ctx, Err(FieldError::NameRequired.into_error(&lang)))?;
            return Ok(Transition::Stay);
        };
        let user_id = ctx.profile().backend_id.ok_or_else(|| {
            BotError::CollaboratorUnavailable("session has no habit service user".into())
        })?;
        let times = self.draft.notification_seconds();
        let backend = ctx.backend();

        let message = match self.mode {
            WizardMode::Create => {
                let habit = backend.create_habit(user_id, &self.draft).await?;
                if !times.is_empty() {
                    backend.create_habit_notifications(habit.id, &times).await?;
                }
                info!("chat {}: created habit {}", ctx.session.chat_id, habit.id);
                i18n::habit_created(&lang, &name)
            }
            WizardMode::Edit { habit_id } => {
                backend.update_habit(habit_id, &self.draft).await?;
                backend.create_habit_notifications(habit_id, &times).await?;
                info!("chat {}: updated habit {habit_id}", ctx.session.chat_id);
                i18n::habit_updated(&lang, &name)
            }
        };
        ctx.messenger().update_main_message(message, None);
        Ok(Transition::end())
    }
}

/// The stored habit and its reminders as an editable draft.
async fn load_draft(
    backend: &dyn BackendRepository,
    habit_id: i64,
) -> Result<Option<HabitDraft>, BotError> {
    let Some(habit) = backend.get_habit(habit_id).await? else {
        return Ok(None);
    };
    let notifications = backend.habit_notifications(habit_id).await?;
    Ok(Some(HabitDraft::from_habit(&habit, &notifications)))
}

#[async_trait]
impl ConversationState for HabitWizardState {
    fn tag(&self) -> StateTag {
        match self.mode {
            WizardMode::Create => StateTag::AddHabit,
            WizardMode::Edit { .. } => StateTag::EditHabit,
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SUSPENDABLE
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        match self.mode {
            WizardMode::Create => {
                self.draft = HabitDraft::new(Some(ctx.profile().last_event_date()));
            }
            WizardMode::Edit { .. } if self.missing => {}
            WizardMode::Edit { habit_id } => match load_draft(ctx.backend(), habit_id).await {
                Ok(Some(draft)) => self.draft = draft,
                Ok(None) => {
                    warn!("chat {}: habit {habit_id} not found", ctx.session.chat_id);
                    self.missing = true;
                }
                Err(e) => {
                    // An empty draft must never reach update_habit.
                    self.missing = true;
                    return Err(crate::states::unavailable(ctx, e));
                }
            },
        }
        if self.missing {
            self.show_missing(ctx);
        } else {
            self.render(ctx);
        }
        Ok(())
    }

    async fn on_restore(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        if !self.missing {
            self.render(ctx);
        }
        Ok(())
    }

    async fn handle_text(
        &mut self,
        ctx: &StateContext,
        msg: &PlainText,
    ) -> Result<Transition, BotError> {
        if self.missing {
            return Ok(Transition::end());
        }
        let outcome = if self.cursor.accepts_text() {
            self.apply_text(ctx, &msg.text).await
        } else {
            Err(FieldError::UseButtons.into_error(&ctx.lang()))
        };
        self.settle(ctx, outcome)?;
        Ok(Transition::Stay)
    }

    async fn handle_action(
        &mut self,
        ctx: &StateContext,
        action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        if self.missing {
            return Ok(Transition::end());
        }
        let data = action.data.as_str();
        if data == "habit:back" {
            return Ok(Transition::end());
        }
        if data == "habit:submit" {
            return self.submit(ctx).await;
        }
        if let Some(field) = data.strip_prefix("field:").and_then(Field::from_key) {
            self.cursor = field;
            self.banner = None;
            self.render(ctx);
            return Ok(Transition::Stay);
        }
        let outcome = self.apply_field_action(ctx, data);
        self.settle(ctx, outcome)?;
        Ok(Transition::Stay)
    }
}
