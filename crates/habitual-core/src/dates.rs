//! Natural-language date parsing for wizard input.
//!
//! Recognises relative words (`today`, `tomorrow`, `yesterday` and their
//! Spanish/German forms), `in N days|weeks`, weekday names (next occurrence,
//! never today), and numeric forms: `YYYY-MM-DD`, `DD.MM.YYYY`, `DD/MM/YYYY`,
//! `DD-MM-YYYY`, `DD.MM` (current year).

use chrono::{Datelike, Duration, NaiveDate, Weekday};

const TODAY: &[&str] = &["today", "now", "hoy", "heute"];
const TOMORROW: &[&str] = &["tomorrow", "mañana", "manana", "morgen"];
const YESTERDAY: &[&str] = &["yesterday", "ayer", "gestern"];

const WEEKDAYS: &[(Weekday, &[&str])] = &[
    (Weekday::Mon, &["monday", "mon", "lunes", "montag"]),
    (Weekday::Tue, &["tuesday", "tue", "martes", "dienstag"]),
    (Weekday::Wed, &["wednesday", "wed", "miércoles", "miercoles", "mittwoch"]),
    (Weekday::Thu, &["thursday", "thu", "jueves", "donnerstag"]),
    (Weekday::Fri, &["friday", "fri", "viernes", "freitag"]),
    (Weekday::Sat, &["saturday", "sat", "sábado", "sabado", "samstag"]),
    (Weekday::Sun, &["sunday", "sun", "domingo", "sonntag"]),
];

/// Parse `input` relative to `today`. Returns `None` for anything unrecognised.
pub fn parse_natural_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = input.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }

    if TODAY.contains(&s.as_str()) {
        return Some(today);
    }
    if TOMORROW.contains(&s.as_str()) {
        return today.succ_opt();
    }
    if YESTERDAY.contains(&s.as_str()) {
        return today.pred_opt();
    }

    let bare = s
        .strip_prefix("next ")
        .or_else(|| s.strip_prefix("on "))
        .unwrap_or(&s);
    if let Some(day) = weekday_named(bare) {
        return Some(next_weekday(today, day));
    }

    if let Some(offset) = parse_relative(&s) {
        return today.checked_add_signed(offset);
    }

    parse_numeric(&s, today.year())
}

fn weekday_named(word: &str) -> Option<Weekday> {
    WEEKDAYS
        .iter()
        .find(|(_, names)| names.contains(&word))
        .map(|(day, _)| *day)
}

/// Next date strictly after `today` falling on `day`.
fn next_weekday(today: NaiveDate, day: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let target = day.num_days_from_monday() as i64;
    let mut delta = (target - current).rem_euclid(7);
    if delta == 0 {
        delta = 7;
    }
    today + Duration::days(delta)
}

/// `in 3 days`, `in 2 weeks`, `in 1 day`.
fn parse_relative(s: &str) -> Option<Duration> {
    let rest = s.strip_prefix("in ")?;
    let mut parts = rest.split_whitespace();
    let n: i64 = parts.next()?.parse().ok()?;
    let unit = parts.next()?;
    if parts.next().is_some() || n < 0 {
        return None;
    }
    match unit {
        "day" | "days" => Some(Duration::days(n)),
        "week" | "weeks" => Some(Duration::weeks(n)),
        _ => None,
    }
}

fn parse_numeric(s: &str, year: i32) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    for fmt in ["%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    let (d, m) = s.split_once('.')?;
    let day: u32 = d.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
