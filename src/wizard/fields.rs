//! The field chain of the habit wizard and its input validators.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use habitual_core::{
    dates::parse_natural_date,
    error::BotError,
    model::{HabitDraft, NotificationCapReached, Recurrence},
    time::{local_to_utc, parse_time_of_day},
};

use crate::i18n::{self, t};

/// Cursor position inside the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    TimesPerDay,
    StartDate,
    EndDate,
    /// Phase one picks the type; phase two toggles days on the mask.
    Recurrence { picking_days: bool },
    Notifications,
}

/// Which event variant a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Text,
    Action,
    Both,
}

impl Field {
    pub const ORDER: [Field; 7] = [
        Field::Name,
        Field::Description,
        Field::TimesPerDay,
        Field::StartDate,
        Field::EndDate,
        Field::Recurrence {
            picking_days: false,
        },
        Field::Notifications,
    ];

    /// Identifier used in `field:<key>` actions.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::TimesPerDay => "times_per_day",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::Recurrence { .. } => "recurrence",
            Self::Notifications => "notifications",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Self::ORDER.into_iter().find(|f| f.key() == key)
    }

    pub fn label(self, lang: &str) -> &'static str {
        match self {
            Self::Name => t("field_name", lang),
            Self::Description => t("field_description", lang),
            Self::TimesPerDay => t("field_times_per_day", lang),
            Self::StartDate => t("field_start_date", lang),
            Self::EndDate => t("field_end_date", lang),
            Self::Recurrence { .. } => t("field_recurrence", lang),
            Self::Notifications => t("field_notifications", lang),
        }
    }

    pub fn prompt(self, lang: &str, recurrence: Recurrence) -> &'static str {
        match self {
            Self::Name => t("prompt_name", lang),
            Self::Description => t("prompt_description", lang),
            Self::TimesPerDay => t("prompt_times_per_day", lang),
            Self::StartDate => t("prompt_start_date", lang),
            Self::EndDate => t("prompt_end_date", lang),
            Self::Recurrence {
                picking_days: false,
            } => t("prompt_recurrence", lang),
            Self::Recurrence { picking_days: true } => match recurrence {
                Recurrence::Monthly => t("prompt_days_monthly", lang),
                _ => t("prompt_days_weekly", lang),
            },
            Self::Notifications => t("prompt_notifications", lang),
        }
    }

    /// Next field after an accepted input. Notifications wrap to Name.
    pub fn next(self) -> Field {
        match self {
            Self::Name => Self::Description,
            Self::Description => Self::TimesPerDay,
            Self::TimesPerDay => Self::StartDate,
            Self::StartDate => Self::EndDate,
            Self::EndDate => Self::Recurrence {
                picking_days: false,
            },
            Self::Recurrence { .. } => Self::Notifications,
            Self::Notifications => Self::Name,
        }
    }

    pub fn modality(self) -> Modality {
        match self {
            Self::Recurrence { .. } => Modality::Action,
            Self::Notifications => Modality::Both,
            _ => Modality::Text,
        }
    }

    pub fn accepts_text(self) -> bool {
        matches!(self.modality(), Modality::Text | Modality::Both)
    }

    /// Same field regardless of phase.
    pub fn same_field(self, other: Field) -> bool {
        self.key() == other.key()
    }
}

/// A rejected input. Rendered as the wizard's error banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    NameLength(usize),
    NameTaken,
    DescriptionLength(usize),
    NotANumber,
    TimesLocked,
    BadDate,
    EndBeforeStart,
    BadTime,
    TooManyNotifications(usize),
    UseButtons,
    NameRequired,
}

impl FieldError {
    pub fn message(&self, lang: &str) -> String {
        match self {
            Self::NameLength(max) => i18n::name_length(lang, *max),
            Self::NameTaken => t("err_name_taken", lang).to_string(),
            Self::DescriptionLength(max) => i18n::description_length(lang, *max),
            Self::NotANumber => t("err_not_a_number", lang).to_string(),
            Self::TimesLocked => t("err_times_locked", lang).to_string(),
            Self::BadDate => t("err_bad_date", lang).to_string(),
            Self::EndBeforeStart => t("err_end_before_start", lang).to_string(),
            Self::BadTime => t("err_bad_time", lang).to_string(),
            Self::TooManyNotifications(max) => i18n::too_many_notifications(lang, *max),
            Self::UseButtons => t("err_use_buttons", lang).to_string(),
            Self::NameRequired => t("err_name_required", lang).to_string(),
        }
    }

    pub fn into_error(self, lang: &str) -> BotError {
        BotError::ValidationFailed(self.message(lang))
    }
}

fn bounded_text(input: &str, max: usize) -> Option<String> {
    let trimmed = input.trim();
    let len = trimmed.chars().count();
    (1..=max).contains(&len).then(|| trimmed.to_string())
}

/// Trimmed name of 1..=max characters. Uniqueness is checked by the caller.
pub fn parse_name(input: &str, max: usize) -> Result<String, FieldError> {
    bounded_text(input, max).ok_or(FieldError::NameLength(max))
}

pub fn parse_description(input: &str, max: usize) -> Result<String, FieldError> {
    bounded_text(input, max).ok_or(FieldError::DescriptionLength(max))
}

/// Positive count. Locked while reminders exist, since they drive it.
pub fn parse_times_per_day(input: &str, draft: &HabitDraft) -> Result<u32, FieldError> {
    if !draft.notifications().is_empty() {
        return Err(FieldError::TimesLocked);
    }
    match input.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(FieldError::NotANumber),
    }
}

pub fn parse_start_date(
    input: &str,
    today: NaiveDate,
    draft: &HabitDraft,
) -> Result<NaiveDate, FieldError> {
    let date = parse_natural_date(input, today).ok_or(FieldError::BadDate)?;
    match draft.end_date {
        Some(end) if end < date => Err(FieldError::EndBeforeStart),
        _ => Ok(date),
    }
}

pub fn parse_end_date(
    input: &str,
    today: NaiveDate,
    draft: &HabitDraft,
) -> Result<NaiveDate, FieldError> {
    let date = parse_natural_date(input, today).ok_or(FieldError::BadDate)?;
    match draft.start_date {
        Some(start) if date < start => Err(FieldError::EndBeforeStart),
        _ => Ok(date),
    }
}

/// Parse a local time, convert it to UTC on `local_today`, and add it.
pub fn add_notification(
    draft: &mut HabitDraft,
    input: &str,
    tz: Tz,
    local_today: NaiveDate,
    max: usize,
) -> Result<(), FieldError> {
    let local = parse_time_of_day(input).ok_or(FieldError::BadTime)?;
    let utc = local_to_utc(local, tz, local_today);
    draft
        .add_notification(utc, max)
        .map(|_| ())
        .map_err(|NotificationCapReached| FieldError::TooManyNotifications(max))
}

/// Handle `ntf:del:<HH:MM>` (UTC) and `ntf:done`. Returns the new cursor.
pub fn apply_notification_action(draft: &mut HabitDraft, data: &str) -> Result<Field, FieldError> {
    if data == "ntf:done" {
        return Ok(Field::Notifications.next());
    }
    let time = data
        .strip_prefix("ntf:del:")
        .and_then(|s| NaiveTime::parse_from_str(s, "%H:%M").ok())
        .ok_or(FieldError::UseButtons)?;
    draft.remove_notification(time);
    Ok(Field::Notifications)
}

/// Handle recurrence keyboard actions. Returns the new cursor.
pub fn apply_recurrence_action(
    draft: &mut HabitDraft,
    picking_days: bool,
    data: &str,
) -> Result<Field, FieldError> {
    if let Some(kind) = data.strip_prefix("rec:") {
        if kind == "done" {
            return if picking_days {
                Ok(Field::Notifications)
            } else {
                Err(FieldError::UseButtons)
            };
        }
        let recurrence = Recurrence::parse(kind).ok_or(FieldError::UseButtons)?;
        draft.set_recurrence(recurrence);
        return Ok(match recurrence {
            Recurrence::Daily => Field::Notifications,
            _ => Field::Recurrence { picking_days: true },
        });
    }

    if let Some(index) = data.strip_prefix("day:") {
        if !picking_days {
            return Err(FieldError::UseButtons);
        }
        let index: u32 = index.parse().map_err(|_| FieldError::UseButtons)?;
        if index >= draft.recurrence.day_slots() {
            return Err(FieldError::UseButtons);
        }
        draft.days.toggle(index);
        return Ok(Field::Recurrence { picking_days: true });
    }

    Err(FieldError::UseButtons)
}
