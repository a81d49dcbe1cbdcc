//! The conversation-state contract and the context states run against.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use habitual_core::{
    config::WizardConfig,
    error::BotError,
    message::{PlainText, StructuredAction},
    traits::{BackendRepository, Channel},
};
use tracing::{debug, warn};

use crate::messenger::Messenger;
use crate::session::{Profile, Session};

/// Closed set of conversation states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateTag {
    Init,
    /// Terminal sentinel: "return to whatever was before me". Never constructed.
    End,
    Registration,
    ChooseLanguage,
    ChooseTimezone,
    WaitCommand,
    Help,
    Settings,
    AddHabit,
    EditHabit,
    DeleteHabit,
    MyHabits,
    HabitProgress,
    TodaysNotifications,
    Progress,
}

impl StateTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::End => "end",
            Self::Registration => "registration",
            Self::ChooseLanguage => "choose_language",
            Self::ChooseTimezone => "choose_timezone",
            Self::WaitCommand => "wait_command",
            Self::Help => "help",
            Self::Settings => "settings",
            Self::AddHabit => "add_habit",
            Self::EditHabit => "edit_habit",
            Self::DeleteHabit => "delete_habit",
            Self::MyHabits => "my_habits",
            Self::HabitProgress => "habit_progress",
            Self::TodaysNotifications => "todays_notifications",
            Self::Progress => "progress",
        }
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability flags a state declares about itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Parked on the suspension stack instead of discarded when displaced.
    pub suspendable: bool,
    /// Vetoes externally requested state switches while current or suspended.
    pub non_switchable: bool,
    /// Receives the triggering event again right after being adopted.
    pub immediate_handle: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        suspendable: false,
        non_switchable: false,
        immediate_handle: false,
    };

    pub const SUSPENDABLE: Capabilities = Capabilities {
        suspendable: true,
        ..Self::NONE
    };
}

/// Construction arguments passed through a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateArgs {
    pub habit_id: Option<i64>,
}

impl StateArgs {
    pub fn habit(habit_id: i64) -> Self {
        Self {
            habit_id: Some(habit_id),
        }
    }
}

/// What a state wants after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    To(StateTag, StateArgs),
}

impl Transition {
    pub fn to(tag: StateTag) -> Self {
        Self::To(tag, StateArgs::default())
    }

    /// Finish this state and go back to the previous one.
    pub fn end() -> Self {
        Self::To(StateTag::End, StateArgs::default())
    }
}

/// Collaborators shared by every session.
pub struct Services {
    pub backend: Arc<dyn BackendRepository>,
    pub channel: Arc<dyn Channel>,
    pub limits: WizardConfig,
}

/// Everything a state may touch while handling one event.
pub struct StateContext {
    pub session: Arc<Session>,
    pub services: Arc<Services>,
    answered: AtomicBool,
}

impl StateContext {
    pub fn new(session: Arc<Session>, services: Arc<Services>) -> Self {
        Self {
            session,
            services,
            answered: AtomicBool::new(false),
        }
    }

    pub fn backend(&self) -> &dyn BackendRepository {
        self.services.backend.as_ref()
    }

    pub fn messenger(&self) -> &Messenger {
        &self.session.messenger
    }

    pub fn limits(&self) -> &WizardConfig {
        &self.services.limits
    }

    /// Snapshot of the session profile.
    pub fn profile(&self) -> Profile {
        self.session.profile()
    }

    pub fn lang(&self) -> String {
        self.session.profile().language
    }

    /// Acknowledge a structured action, optionally with a short toast.
    pub async fn answer(&self, action: &StructuredAction, text: Option<&str>) {
        if self.answered.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.services.channel.answer_action(&action.id, text).await {
            warn!("failed to answer action {}: {e}", action.id);
        }
    }

    pub fn was_answered(&self) -> bool {
        self.answered.load(Ordering::SeqCst)
    }
}

/// One node of a session's dialogue.
#[async_trait]
pub trait ConversationState: Send {
    fn tag(&self) -> StateTag;

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    async fn handle_text(
        &mut self,
        _ctx: &StateContext,
        _msg: &PlainText,
    ) -> Result<Transition, BotError> {
        Ok(Transition::Stay)
    }

    async fn handle_action(
        &mut self,
        _ctx: &StateContext,
        _action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        Ok(Transition::Stay)
    }

    async fn on_enter(&mut self, _ctx: &StateContext) -> Result<(), BotError> {
        debug!("state {}: enter", self.tag());
        Ok(())
    }

    async fn on_exit(&mut self, _ctx: &StateContext) -> Result<(), BotError> {
        debug!("state {}: exit", self.tag());
        Ok(())
    }

    async fn on_suspend(&mut self, _ctx: &StateContext) -> Result<(), BotError> {
        debug!("state {}: suspend", self.tag());
        Ok(())
    }

    async fn on_restore(&mut self, _ctx: &StateContext) -> Result<(), BotError> {
        debug!("state {}: restore", self.tag());
        Ok(())
    }
}
