//! Slash commands and the states they open.

use habitual_core::message::IncomingEvent;

use crate::machine::StateTag;

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    AddHabit,
    MyHabits,
    Today,
    Progress,
    Settings,
    Language,
    Timezone,
}

impl Command {
    /// Parse a command from message text. Unknown `/` prefixes are not
    /// commands and go to the current state like any other text.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/help@habitual_bot" → "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            "/add_habit" => Some(Self::AddHabit),
            "/my_habits" => Some(Self::MyHabits),
            "/today" => Some(Self::Today),
            "/progress" => Some(Self::Progress),
            "/settings" => Some(Self::Settings),
            "/language" | "/lang" => Some(Self::Language),
            "/timezone" | "/tz" => Some(Self::Timezone),
            _ => None,
        }
    }

    /// Command carried by a plain-text event, if any.
    pub fn of(event: &IncomingEvent) -> Option<Self> {
        match event {
            IncomingEvent::Text(msg) => Self::parse(&msg.text),
            IncomingEvent::Action(_) => None,
        }
    }

    /// State the command switches to. `/start` has none: the current state
    /// handles it.
    pub fn target(self) -> Option<StateTag> {
        match self {
            Self::Start => None,
            Self::Help => Some(StateTag::Help),
            Self::AddHabit => Some(StateTag::AddHabit),
            Self::MyHabits => Some(StateTag::MyHabits),
            Self::Today => Some(StateTag::TodaysNotifications),
            Self::Progress => Some(StateTag::Progress),
            Self::Settings => Some(StateTag::Settings),
            Self::Language => Some(StateTag::ChooseLanguage),
            Self::Timezone => Some(StateTag::ChooseTimezone),
        }
    }
}
