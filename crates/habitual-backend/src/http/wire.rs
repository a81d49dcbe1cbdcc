//! Request bodies sent to the habit service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use habitual_core::model::{HabitDraft, Recurrence};

#[derive(Debug, Serialize)]
pub(crate) struct SignupBody<'a> {
    pub name: &'a str,
    pub telegram_id: i64,
    pub language: &'a str,
    pub timezone: &'a str,
}

/// Habit fields shared by create and update.
#[derive(Debug, Serialize)]
pub(crate) struct HabitBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub times_per_day: u32,
    pub repeat_type: Recurrence,
    pub days_mask: u32,
}

impl<'a> HabitBody<'a> {
    pub fn from_draft(draft: &'a HabitDraft) -> Self {
        Self {
            id: None,
            user_id: None,
            name: draft.name.as_deref(),
            description: draft.description.as_deref(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            times_per_day: draft.times_per_day.unwrap_or(1),
            repeat_type: draft.recurrence,
            days_mask: draft.days.bits(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NotificationsBody<'a> {
    pub times: &'a [i64],
}

#[derive(Debug, Serialize)]
pub(crate) struct HabitEventBody {
    pub habit_id: i64,
    pub notification_id: Option<i64>,
    pub timestamp: DateTime<Utc>,
}
