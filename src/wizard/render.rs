//! Summary message and keyboards of the habit wizard.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use habitual_core::{
    message::{Button, Keyboard},
    model::{HabitDraft, Recurrence},
    time::{format_hhmm, utc_to_local},
};

use super::fields::Field;
use crate::i18n::t;

const CURRENT_MARKER: &str = "▶️ ";
const BANNER_MARKER: &str = "⚠️ ";
const SELECTED_MARKER: &str = "✅ ";

/// Everything needed to draw one frame of the wizard.
pub struct WizardView<'a> {
    pub header: &'a str,
    pub draft: &'a HabitDraft,
    pub cursor: Field,
    pub banner: Option<&'a str>,
    pub lang: &'a str,
    pub tz: Tz,
    /// Local date used to shift stored UTC reminder times.
    pub today: NaiveDate,
}

impl WizardView<'_> {
    pub fn render(&self) -> (String, Keyboard) {
        (self.summary(), self.keyboard())
    }

    fn summary(&self) -> String {
        let mut text = format!("{}\n\n", self.header);
        for field in Field::ORDER {
            if field.same_field(self.cursor) {
                text.push_str(CURRENT_MARKER);
            }
            text.push_str(&format!("{}: {}\n", field.label(self.lang), self.value(field)));
        }
        if let Some(banner) = self.banner {
            text.push_str(&format!("\n{BANNER_MARKER}{banner}\n"));
        }
        text.push('\n');
        text.push_str(self.cursor.prompt(self.lang, self.draft.recurrence));
        text
    }

    /// Display value of a field, or a placeholder when unset.
    pub fn value(&self, field: Field) -> String {
        let not_set = || t("not_set", self.lang).to_string();
        let draft = self.draft;
        match field {
            Field::Name => draft.name.clone().unwrap_or_else(not_set),
            Field::Description => draft.description.clone().unwrap_or_else(not_set),
            Field::TimesPerDay => draft
                .times_per_day
                .map(|n| n.to_string())
                .unwrap_or_else(not_set),
            Field::StartDate => draft.start_date.map(format_date).unwrap_or_else(not_set),
            Field::EndDate => draft.end_date.map(format_date).unwrap_or_else(not_set),
            Field::Recurrence { .. } => self.recurrence_value(),
            Field::Notifications => {
                if draft.notifications().is_empty() {
                    not_set()
                } else {
                    draft
                        .notifications()
                        .iter()
                        .map(|utc| self.local(*utc))
                        .collect::<Vec<_>>()
                        .join(", ")
                }
            }
        }
    }

    fn recurrence_value(&self) -> String {
        let draft = self.draft;
        let label = recurrence_label(draft.recurrence, self.lang);
        let days: Vec<String> = match draft.recurrence {
            Recurrence::Daily => return label.to_string(),
            Recurrence::Weekly => draft
                .days
                .indices()
                .filter(|i| *i < 7)
                .map(|i| weekday_label(i, self.lang).to_string())
                .collect(),
            Recurrence::Monthly => draft
                .days
                .indices()
                .filter(|i| *i < 31)
                .map(|i| (i + 1).to_string())
                .collect(),
        };
        format!("{label}: {}", days.join(", "))
    }

    fn local(&self, utc: NaiveTime) -> String {
        format_hhmm(utc_to_local(utc, self.tz, self.today))
    }

    fn keyboard(&self) -> Keyboard {
        match self.cursor {
            Field::Recurrence {
                picking_days: false,
            } => self.recurrence_type_keyboard(),
            Field::Recurrence { picking_days: true } => self.days_keyboard(),
            Field::Notifications => self.notifications_keyboard(),
            _ => self.generic_keyboard(),
        }
    }

    /// Field selectors two per row, then submit (once named) and back.
    fn generic_keyboard(&self) -> Keyboard {
        let mut keyboard = Keyboard::new();
        for pair in Field::ORDER.chunks(2) {
            keyboard = keyboard.row(
                pair.iter()
                    .map(|f| Button::new(f.label(self.lang), format!("field:{}", f.key())))
                    .collect(),
            );
        }
        let mut last = Vec::new();
        if self.draft.is_ready() {
            last.push(Button::new(t("btn_save", self.lang), "habit:submit"));
        }
        last.push(Button::new(t("btn_back", self.lang), "habit:back"));
        keyboard.row(last)
    }

    fn recurrence_type_keyboard(&self) -> Keyboard {
        Keyboard::new().row(
            Recurrence::ALL
                .iter()
                .map(|r| {
                    let mut label = recurrence_label(*r, self.lang).to_string();
                    if *r == self.draft.recurrence {
                        label.insert_str(0, SELECTED_MARKER);
                    }
                    Button::new(label, format!("rec:{}", r.as_str()))
                })
                .collect(),
        )
    }

    fn days_keyboard(&self) -> Keyboard {
        let draft = self.draft;
        let slots = draft.recurrence.day_slots();
        let buttons: Vec<Button> = (0..slots)
            .map(|i| {
                let name = match draft.recurrence {
                    Recurrence::Weekly => weekday_label(i, self.lang).to_string(),
                    _ => (i + 1).to_string(),
                };
                let label = if draft.days.is_set(i) {
                    format!("{SELECTED_MARKER}{name}")
                } else {
                    name
                };
                Button::new(label, format!("day:{i}"))
            })
            .collect();

        let per_row = if draft.recurrence == Recurrence::Weekly { 4 } else { 7 };
        let mut keyboard = Keyboard::new();
        for chunk in buttons.chunks(per_row) {
            keyboard = keyboard.row(chunk.to_vec());
        }
        keyboard.button(t("btn_done", self.lang), "rec:done")
    }

    /// One delete button per reminder, labelled in local time, keyed in UTC.
    fn notifications_keyboard(&self) -> Keyboard {
        let buttons: Vec<Button> = self
            .draft
            .notifications()
            .iter()
            .map(|utc| {
                Button::new(
                    format!("❌ {}", self.local(*utc)),
                    format!("ntf:del:{}", format_hhmm(*utc)),
                )
            })
            .collect();
        let mut keyboard = Keyboard::new();
        for chunk in buttons.chunks(3) {
            keyboard = keyboard.row(chunk.to_vec());
        }
        keyboard.button(t("btn_done", self.lang), "ntf:done")
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn recurrence_label(recurrence: Recurrence, lang: &str) -> &'static str {
    match recurrence {
        Recurrence::Daily => t("rec_daily", lang),
        Recurrence::Weekly => t("rec_weekly", lang),
        Recurrence::Monthly => t("rec_monthly", lang),
    }
}

fn weekday_label(index: u32, lang: &str) -> &'static str {
    match index {
        0 => t("wd_0", lang),
        1 => t("wd_1", lang),
        2 => t("wd_2", lang),
        3 => t("wd_3", lang),
        4 => t("wd_4", lang),
        5 => t("wd_5", lang),
        _ => t("wd_6", lang),
    }
}
