//! Format helpers for strings with interpolation.

use chrono::{Datelike, NaiveDate};
use habitual_core::message::MenuCommand;
use habitual_core::model::{HabitStatistics, OverallProgress};

use super::t;

/// Reminder pushed by the notificator.
pub fn reminder(lang: &str, habit: &str, time: &str) -> String {
    match lang {
        "es" => format!("⏰ Es hora de «{habit}» ({time})."),
        "de" => format!("⏰ Zeit für „{habit}“ ({time})."),
        _ => format!("⏰ Time for “{habit}” ({time})."),
    }
}

pub fn name_length(lang: &str, max: usize) -> String {
    match lang {
        "es" => format!("El nombre debe tener entre 1 y {max} caracteres."),
        "de" => format!("Der Name muss 1 bis {max} Zeichen lang sein."),
        _ => format!("The name must be 1 to {max} characters long."),
    }
}

pub fn description_length(lang: &str, max: usize) -> String {
    match lang {
        "es" => format!("La descripción debe tener entre 1 y {max} caracteres."),
        "de" => format!("Die Beschreibung muss 1 bis {max} Zeichen lang sein."),
        _ => format!("The description must be 1 to {max} characters long."),
    }
}

pub fn too_many_notifications(lang: &str, max: usize) -> String {
    match lang {
        "es" => format!("Puedes tener como máximo {max} recordatorios."),
        "de" => format!("Du kannst höchstens {max} Erinnerungen haben."),
        _ => format!("You can have at most {max} reminders."),
    }
}

pub fn habit_created(lang: &str, name: &str) -> String {
    match lang {
        "es" => format!("✅ Hábito «{name}» creado."),
        "de" => format!("✅ Gewohnheit „{name}“ angelegt."),
        _ => format!("✅ Habit “{name}” created."),
    }
}

pub fn habit_updated(lang: &str, name: &str) -> String {
    match lang {
        "es" => format!("✅ Hábito «{name}» actualizado."),
        "de" => format!("✅ Gewohnheit „{name}“ aktualisiert."),
        _ => format!("✅ Habit “{name}” updated."),
    }
}

pub fn delete_confirm(lang: &str, name: &str) -> String {
    match lang {
        "es" => format!("🗑 ¿Eliminar «{name}» y todos sus recordatorios?"),
        "de" => format!("🗑 „{name}“ und alle Erinnerungen löschen?"),
        _ => format!("🗑 Delete “{name}” and all its reminders?"),
    }
}

/// `Page 2/5` footer of paged lists.
pub fn page(lang: &str, current: usize, total: usize) -> String {
    match lang {
        "es" => format!("Página {current}/{total}"),
        "de" => format!("Seite {current}/{total}"),
        _ => format!("Page {current}/{total}"),
    }
}

pub fn timezone_current(lang: &str, tz: &str, local_time: &str, offset: &str) -> String {
    match lang {
        "es" => format!("Zona horaria actual: {tz} ({offset}), hora local {local_time}."),
        "de" => format!("Aktuelle Zeitzone: {tz} ({offset}), Ortszeit {local_time}."),
        _ => format!("Current timezone: {tz} ({offset}), local time {local_time}."),
    }
}

pub fn timezone_selected(lang: &str, tz: &str, local_time: &str, offset: &str) -> String {
    match lang {
        "es" => format!("📍 {tz} ({offset}), ahora son las {local_time}. ¿Confirmar?"),
        "de" => format!("📍 {tz} ({offset}), dort ist es {local_time}. Bestätigen?"),
        _ => format!("📍 {tz} ({offset}), it is {local_time} there. Confirm?"),
    }
}

pub fn habit_progress(lang: &str, name: &str, stats: &HabitStatistics) -> String {
    let pct = stats.percent_complete.round();
    match lang {
        "es" => format!(
            "📊 {name}\n\nHoy: {}/{}\nTotal: {}/{} ({pct}%)\nRacha actual: {} días",
            stats.today_done,
            stats.today_expected,
            stats.total_completed,
            stats.total_expected,
            stats.current_streak
        ),
        "de" => format!(
            "📊 {name}\n\nHeute: {}/{}\nGesamt: {}/{} ({pct}%)\nAktuelle Serie: {} Tage",
            stats.today_done,
            stats.today_expected,
            stats.total_completed,
            stats.total_expected,
            stats.current_streak
        ),
        _ => format!(
            "📊 {name}\n\nToday: {}/{}\nTotal: {}/{} ({pct}%)\nCurrent streak: {} days",
            stats.today_done,
            stats.today_expected,
            stats.total_completed,
            stats.total_expected,
            stats.current_streak
        ),
    }
}

/// Overall progress with a tagline that changes once a day.
pub fn progress(lang: &str, p: &OverallProgress, today: NaiveDate) -> String {
    let pct = p.percent_complete.round();
    let body = match lang {
        "es" => format!(
            "📈 Tu progreso\n\nHábitos: {}\nHoy: {}/{}\nEsta semana: {}/{}\nEste mes: {}/{}\nTotal: {}/{} ({pct}%)",
            p.habit_count, p.today_done, p.today_expected, p.week_done, p.week_expected,
            p.month_done, p.month_expected, p.total_completed, p.total_expected
        ),
        "de" => format!(
            "📈 Dein Fortschritt\n\nGewohnheiten: {}\nHeute: {}/{}\nDiese Woche: {}/{}\nDieser Monat: {}/{}\nGesamt: {}/{} ({pct}%)",
            p.habit_count, p.today_done, p.today_expected, p.week_done, p.week_expected,
            p.month_done, p.month_expected, p.total_completed, p.total_expected
        ),
        _ => format!(
            "📈 Your progress\n\nHabits: {}\nToday: {}/{}\nThis week: {}/{}\nThis month: {}/{}\nTotal: {}/{} ({pct}%)",
            p.habit_count, p.today_done, p.today_expected, p.week_done, p.week_expected,
            p.month_done, p.month_expected, p.total_completed, p.total_expected
        ),
    };
    format!("{body}\n\n{}", tagline(lang, today))
}

pub fn tagline(lang: &str, today: NaiveDate) -> &'static str {
    const KEYS: [&str; 5] = ["tagline_0", "tagline_1", "tagline_2", "tagline_3", "tagline_4"];
    t(KEYS[today.ordinal0() as usize % KEYS.len()], lang)
}

/// Localized command menu published after registration.
pub fn command_menu(lang: &str) -> Vec<MenuCommand> {
    [
        "start",
        "help",
        "add_habit",
        "my_habits",
        "today",
        "progress",
        "settings",
        "language",
        "timezone",
    ]
    .into_iter()
    .map(|cmd| MenuCommand {
        command: cmd.to_string(),
        description: t(&format!("cmd_{cmd}"), lang).to_string(),
    })
    .collect()
}
