//! Time-of-day helpers: wire seconds, user input, and timezone shifts.

use chrono::{DateTime, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Timezone used when a user has not picked one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Seconds since midnight into a time of day. Out-of-range values yield `None`.
pub fn seconds_to_time(secs: i64) -> Option<NaiveTime> {
    let secs = u32::try_from(secs).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
}

/// Time of day into whole seconds since midnight.
pub fn time_to_seconds(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight())
}

/// Resolve an IANA timezone name, falling back to UTC.
pub fn parse_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or(Tz::UTC)
}

/// Today's date in `tz`.
pub fn local_date(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Convert a local time of day on `date` into UTC time of day.
///
/// Ambiguous local times take the earliest instant; times skipped by a DST
/// jump are shifted forward one hour.
pub fn local_to_utc(time: NaiveTime, tz: Tz, date: NaiveDate) -> NaiveTime {
    let naive = date.and_time(time);
    let resolved = tz
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest()
        });
    match resolved {
        Some(local) => local.with_timezone(&Utc).time(),
        None => time,
    }
}

/// Convert a UTC time of day on `date` into local time of day.
pub fn utc_to_local(time: NaiveTime, tz: Tz, date: NaiveDate) -> NaiveTime {
    Utc.from_utc_datetime(&date.and_time(time))
        .with_timezone(&tz)
        .time()
}

/// Render a time as `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parse user input like `9`, `09:30`, `9.30`, `21h`, or `9:30 pm`.
pub fn parse_time_of_day(input: &str) -> Option<NaiveTime> {
    let lower = input.trim().to_lowercase();
    let (body, meridiem) = if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim(), Some(true))
    } else if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim(), Some(false))
    } else {
        (lower.as_str(), None)
    };
    let body = body.strip_suffix('h').unwrap_or(body);

    let (h, m) = match body.split_once([':', '.']) {
        Some((h, m)) => (h.trim(), m.trim()),
        None => (body, "0"),
    };
    if h.is_empty() || m.is_empty() || m.len() > 2 {
        return None;
    }
    let mut hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;

    if let Some(pm) = meridiem {
        if hour == 0 || hour > 12 {
            return None;
        }
        hour = match (pm, hour) {
            (false, 12) => 0,
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, h) => h,
        };
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Offset label such as `UTC+3` or `UTC-5:30` for `tz` at `now`.
pub fn offset_label(tz: Tz, now: DateTime<Utc>) -> String {
    let secs = tz.offset_from_utc_datetime(&now.naive_utc()).fix().local_minus_utc();
    if secs == 0 {
        return "UTC".to_string();
    }
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.abs();
    let (h, m) = (abs / 3600, (abs % 3600) / 60);
    if m == 0 {
        format!("UTC{sign}{h}")
    } else {
        format!("UTC{sign}{h}:{m:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_seconds_bounds() {
        assert_eq!(seconds_to_time(0), Some(t(0, 0)));
        assert_eq!(seconds_to_time(9 * 3600 + 30 * 60), Some(t(9, 30)));
        assert_eq!(seconds_to_time(-1), None);
        assert_eq!(seconds_to_time(86_400), None);
        assert_eq!(time_to_seconds(t(23, 59)), 86_340);
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("9"), Some(t(9, 0)));
        assert_eq!(parse_time_of_day(" 09:30 "), Some(t(9, 30)));
        assert_eq!(parse_time_of_day("9.05"), Some(t(9, 5)));
        assert_eq!(parse_time_of_day("21h"), Some(t(21, 0)));
        assert_eq!(parse_time_of_day("9:30 pm"), Some(t(21, 30)));
        assert_eq!(parse_time_of_day("12am"), Some(t(0, 0)));
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("13pm"), None);
        assert_eq!(parse_time_of_day("soon"), None);
        assert_eq!(parse_time_of_day("9:"), None);
    }

    #[test]
    fn test_local_utc_shift() {
        let madrid = parse_timezone("Europe/Madrid");
        let winter = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let summer = NaiveDate::from_ymd_opt(2026, 7, 15).unwrap();
        assert_eq!(local_to_utc(t(9, 0), madrid, winter), t(8, 0));
        assert_eq!(local_to_utc(t(9, 0), madrid, summer), t(7, 0));
        assert_eq!(utc_to_local(t(7, 0), madrid, summer), t(9, 0));
        // Crossing midnight wraps the time of day.
        assert_eq!(local_to_utc(t(0, 30), madrid, winter), t(23, 30));
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        assert_eq!(parse_timezone("Mars/Olympus"), Tz::UTC);
    }

    #[test]
    fn test_offset_label() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(offset_label(Tz::UTC, now), "UTC");
        assert_eq!(offset_label(parse_timezone("Europe/Moscow"), now), "UTC+3");
        assert_eq!(offset_label(parse_timezone("America/New_York"), now), "UTC-5");
        assert_eq!(offset_label(parse_timezone("Asia/Kolkata"), now), "UTC+5:30");
    }
}
