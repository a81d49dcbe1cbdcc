//! Domain records exchanged with the habit service and built by the wizard.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{seconds_to_time, time_to_seconds};

/// A registered user on the habit service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub telegram_account: Option<TelegramAccount>,
}

impl User {
    /// Chat identity linked to this user, if any.
    pub fn chat_id(&self) -> Option<i64> {
        self.telegram_account.as_ref().map(|a| a.telegram_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramAccount {
    pub telegram_id: i64,
}

/// Partial user update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// How often a habit repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub const ALL: [Recurrence; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Number of selectable day slots for this recurrence.
    pub fn day_slots(&self) -> u32 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 31,
        }
    }
}

/// Compact recurrence-day selection.
///
/// Daily uses bit 0 only, weekly maps Monday..Sunday to bits 0..6, monthly maps
/// day-of-month minus one to its bit. The mask is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayMask(u32);

impl Default for DayMask {
    fn default() -> Self {
        Self::FIRST
    }
}

impl DayMask {
    /// Only bit 0 set.
    pub const FIRST: DayMask = DayMask(1);

    /// Build from raw bits. Zero is normalized to bit 0.
    pub fn from_bits(bits: u32) -> Self {
        if bits == 0 {
            Self::FIRST
        } else {
            Self(bits)
        }
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_set(&self, index: u32) -> bool {
        index < 32 && self.0 & (1 << index) != 0
    }

    pub fn set(&mut self, index: u32) {
        if index < 32 {
            self.0 |= 1 << index;
        }
    }

    /// Clear a bit. Clearing the last set bit leaves bit 0 set.
    pub fn unset(&mut self, index: u32) {
        if index >= 32 {
            return;
        }
        self.0 &= !(1 << index);
        if self.0 == 0 {
            self.0 = Self::FIRST.0;
        }
    }

    pub fn toggle(&mut self, index: u32) {
        if self.is_set(index) {
            self.unset(index);
        } else {
            self.set(index);
        }
    }

    /// Set bit indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        (0..32).filter(|i| self.is_set(*i))
    }

    /// Whether a habit with this mask is scheduled on `date`.
    pub fn matches(&self, recurrence: Recurrence, date: NaiveDate) -> bool {
        match recurrence {
            Recurrence::Daily => true,
            Recurrence::Weekly => self.is_set(date.weekday().num_days_from_monday()),
            Recurrence::Monthly => self.is_set(date.day0()),
        }
    }
}

/// A habit stored on the habit service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_times_per_day")]
    pub times_per_day: u32,
    #[serde(default)]
    pub repeat_type: Recurrence,
    #[serde(default)]
    pub days_mask: DayMask,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_times_per_day() -> u32 {
    1
}

/// Returned by [`HabitDraft::add_notification`] when the list is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationCapReached;

/// Mutable record accumulated by the habit wizard.
///
/// Notification times are UTC, deduplicated and ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub times_per_day: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub recurrence: Recurrence,
    pub days: DayMask,
    notifications: Vec<NaiveTime>,
}

impl HabitDraft {
    pub fn new(start_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            ..Self::default()
        }
    }

    /// Seed a draft from an existing habit and its notification times (UTC).
    pub fn from_habit(habit: &Habit, notifications: &[Notification]) -> Self {
        let mut draft = Self {
            name: Some(habit.name.clone()),
            description: habit.description.clone(),
            times_per_day: Some(habit.times_per_day),
            start_date: Some(habit.start_date),
            end_date: habit.end_date,
            recurrence: habit.repeat_type,
            days: habit.days_mask,
            notifications: Vec::new(),
        };
        for time in notifications.iter().filter_map(Notification::time) {
            if !draft.notifications.contains(&time) {
                draft.notifications.push(time);
            }
        }
        draft.notifications.sort();
        if !draft.notifications.is_empty() {
            draft.sync_times_per_day();
        }
        draft
    }

    /// A draft can be submitted once it has a name.
    pub fn is_ready(&self) -> bool {
        self.name.is_some()
    }

    pub fn notifications(&self) -> &[NaiveTime] {
        &self.notifications
    }

    /// Insert a UTC time keeping the list sorted and unique.
    ///
    /// Returns `Ok(false)` when the time was already present. Adding a new time
    /// to a full list fails and leaves the list unchanged.
    pub fn add_notification(
        &mut self,
        time: NaiveTime,
        max: usize,
    ) -> Result<bool, NotificationCapReached> {
        match self.notifications.binary_search(&time) {
            Ok(_) => Ok(false),
            Err(_) if self.notifications.len() >= max => Err(NotificationCapReached),
            Err(pos) => {
                self.notifications.insert(pos, time);
                self.sync_times_per_day();
                Ok(true)
            }
        }
    }

    /// Remove a UTC time. Returns whether anything was removed.
    pub fn remove_notification(&mut self, time: NaiveTime) -> bool {
        match self.notifications.binary_search(&time) {
            Ok(pos) => {
                self.notifications.remove(pos);
                self.sync_times_per_day();
                true
            }
            Err(_) => false,
        }
    }

    /// Change the recurrence type. A different type resets the day mask.
    pub fn set_recurrence(&mut self, recurrence: Recurrence) {
        if self.recurrence != recurrence {
            self.recurrence = recurrence;
            self.days = DayMask::FIRST;
        }
    }

    fn sync_times_per_day(&mut self) {
        self.times_per_day = Some(self.notifications.len().max(1) as u32);
    }

    /// Notification payloads for the habit service.
    pub fn notification_seconds(&self) -> Vec<i64> {
        self.notifications.iter().map(|t| time_to_seconds(*t)).collect()
    }
}

/// A scheduled reminder for a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub notification_id: Option<i64>,
    pub habit_id: i64,
    /// Seconds since midnight UTC; `None` means unscheduled.
    #[serde(default)]
    pub time_in_seconds: Option<i64>,
    /// Owner, present on notifications returned for a time window.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Denormalized habit name, when the service includes it.
    #[serde(default)]
    pub habit_name: Option<String>,
}

impl Notification {
    /// UTC time of day, if scheduled.
    pub fn time(&self) -> Option<NaiveTime> {
        self.time_in_seconds.and_then(seconds_to_time)
    }
}

/// Completion statistics for one habit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitStatistics {
    pub habit_id: i64,
    #[serde(default)]
    pub today_done: u32,
    #[serde(default)]
    pub today_expected: u32,
    #[serde(default)]
    pub total_completed: u32,
    #[serde(default)]
    pub total_expected: u32,
    #[serde(default)]
    pub percent_complete: f64,
    #[serde(default)]
    pub current_streak: u32,
}

/// Completion statistics across all habits of a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallProgress {
    pub habit_count: u32,
    pub today_done: u32,
    pub today_expected: u32,
    pub percent_complete: f64,
    pub total_completed: u32,
    pub total_expected: u32,
    pub week_done: u32,
    pub week_expected: u32,
    pub month_done: u32,
    pub month_expected: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_day_mask_never_zero() {
        let mut mask = DayMask::FIRST;
        mask.unset(0);
        assert_eq!(mask, DayMask::FIRST);

        let mut mask = DayMask::from_bits(0b1000);
        mask.unset(3);
        assert_eq!(mask.bits(), 1);
        assert_eq!(DayMask::from_bits(0), DayMask::FIRST);
    }

    #[test]
    fn test_day_mask_toggle_round_trip() {
        let mut mask = DayMask::FIRST;
        let original = mask;
        mask.toggle(2);
        assert!(mask.is_set(2));
        assert_eq!(mask.bits(), 0b101);
        mask.toggle(2);
        assert_eq!(mask, original);
    }

    #[test]
    fn test_day_mask_matches_dates() {
        // 2026-10-14 is a Wednesday.
        let wed = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let mut weekly = DayMask::FIRST;
        assert!(!weekly.matches(Recurrence::Weekly, wed));
        weekly.set(2);
        assert!(weekly.matches(Recurrence::Weekly, wed));

        let monthly = DayMask::from_bits(1 << 13);
        assert!(monthly.matches(Recurrence::Monthly, wed));
        assert!(DayMask::FIRST.matches(Recurrence::Daily, wed));
    }

    #[test]
    fn test_notifications_sorted_and_capped() {
        let mut draft = HabitDraft::default();
        for h in (0..10).rev() {
            assert_eq!(draft.add_notification(t(h + 8, 0), 10), Ok(true));
        }
        let expected: Vec<_> = (8..18).map(|h| t(h, 0)).collect();
        assert_eq!(draft.notifications(), expected.as_slice());
        assert_eq!(draft.times_per_day, Some(10));

        assert_eq!(
            draft.add_notification(t(23, 0), 10),
            Err(NotificationCapReached)
        );
        assert_eq!(draft.notifications(), expected.as_slice());

        // Re-adding an existing time is not an error even at the cap.
        assert_eq!(draft.add_notification(t(8, 0), 10), Ok(false));
    }

    #[test]
    fn test_remove_notification_mirrors_times_per_day() {
        let mut draft = HabitDraft::default();
        draft.add_notification(t(9, 0), 10).unwrap();
        draft.add_notification(t(21, 0), 10).unwrap();
        assert_eq!(draft.times_per_day, Some(2));
        assert!(draft.remove_notification(t(9, 0)));
        assert!(!draft.remove_notification(t(9, 0)));
        assert!(draft.remove_notification(t(21, 0)));
        assert_eq!(draft.times_per_day, Some(1));
    }

    #[test]
    fn test_set_recurrence_resets_mask() {
        let mut draft = HabitDraft::default();
        draft.set_recurrence(Recurrence::Weekly);
        draft.days.set(4);
        draft.set_recurrence(Recurrence::Weekly);
        assert!(draft.days.is_set(4));
        draft.set_recurrence(Recurrence::Monthly);
        assert_eq!(draft.days, DayMask::FIRST);
    }

    #[test]
    fn test_habit_deserializes_with_defaults() {
        let json = r#"{
            "id": 7,
            "user_id": 3,
            "name": "Read",
            "start_date": "2026-01-01"
        }"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.times_per_day, 1);
        assert_eq!(habit.repeat_type, Recurrence::Daily);
        assert_eq!(habit.days_mask, DayMask::FIRST);
    }

    #[test]
    fn test_draft_from_habit_dedups_notifications() {
        let habit = Habit {
            id: 1,
            user_id: 2,
            name: "Walk".into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: None,
            times_per_day: 5,
            repeat_type: Recurrence::Weekly,
            days_mask: DayMask::from_bits(0b11),
            created_at: None,
        };
        let n = |secs| Notification {
            notification_id: None,
            habit_id: 1,
            time_in_seconds: secs,
            user_id: None,
            habit_name: None,
        };
        let draft = HabitDraft::from_habit(&habit, &[n(Some(7200)), n(None), n(Some(3600)), n(Some(7200))]);
        assert_eq!(draft.notifications(), &[t(1, 0), t(2, 0)]);
        assert_eq!(draft.times_per_day, Some(2));
        assert_eq!(draft.recurrence, Recurrence::Weekly);
    }
}
