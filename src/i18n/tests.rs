use super::*;
use chrono::NaiveDate;

const KEYS: &[&str] = &[
    "service_unavailable",
    "btn_back",
    "btn_yes",
    "btn_no",
    "btn_done",
    "btn_confirm",
    "btn_save",
    "btn_prev",
    "btn_next",
    "welcome",
    "registration_done",
    "send_any_text",
    "choose_language",
    "language_saved",
    "timezone_prompt",
    "timezone_no_matches",
    "timezone_too_many",
    "timezone_pick",
    "timezone_saved",
    "help_text",
    "settings_header",
    "btn_language",
    "btn_timezone",
    "my_habits_header",
    "no_habits",
    "habit_deleted",
    "habit_not_found",
    "todays_header",
    "no_notifications_today",
    "any_time",
    "marked_done",
    "wizard_create_header",
    "wizard_edit_header",
    "field_name",
    "field_description",
    "field_times_per_day",
    "field_start_date",
    "field_end_date",
    "field_recurrence",
    "field_notifications",
    "prompt_name",
    "prompt_description",
    "prompt_times_per_day",
    "prompt_start_date",
    "prompt_end_date",
    "prompt_recurrence",
    "prompt_days_weekly",
    "prompt_days_monthly",
    "prompt_notifications",
    "err_name_taken",
    "err_not_a_number",
    "err_times_locked",
    "err_bad_date",
    "err_end_before_start",
    "err_bad_time",
    "err_use_buttons",
    "err_name_required",
    "rec_daily",
    "rec_weekly",
    "rec_monthly",
    "wd_0",
    "wd_6",
    "not_set",
    "your_habit",
    "tagline_0",
    "tagline_4",
];

#[test]
fn test_all_keys_have_english_fallback() {
    for key in KEYS {
        assert_ne!(t(key, "en"), "???", "missing English for {key}");
    }
}

#[test]
fn test_all_languages_resolve_every_key() {
    for (lang, _) in LANGUAGES {
        for key in KEYS {
            assert_ne!(t(key, lang), "???", "{key} unresolved for {lang}");
        }
    }
}

#[test]
fn test_unknown_language_falls_back_to_english() {
    assert_eq!(t("btn_back", "fr"), t("btn_back", "en"));
    assert_eq!(reminder("xx", "Read", "09:00"), reminder("en", "Read", "09:00"));
}

#[test]
fn test_partial_translation_falls_back_per_key() {
    // Arrows are shared and only defined in English.
    assert_eq!(t("btn_next", "de"), "▶️");
}

#[test]
fn test_unknown_key() {
    assert_eq!(t("definitely_not_a_key", "en"), "???");
}

#[test]
fn test_localized_values_differ() {
    assert_ne!(t("choose_language", "es"), t("choose_language", "en"));
    assert_ne!(t("choose_language", "de"), t("choose_language", "en"));
}

#[test]
fn test_command_menu_is_localized() {
    let menu = command_menu("es");
    assert_eq!(menu.len(), 9);
    assert_eq!(menu[2].command, "add_habit");
    assert_eq!(menu[2].description, "Crear un hábito nuevo");
    assert!(menu.iter().all(|c| c.description != "???"));
}

#[test]
fn test_tagline_rotates_daily() {
    let d1 = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    let d2 = d1.succ_opt().unwrap();
    assert_ne!(tagline("en", d1), tagline("en", d2));
}

#[test]
fn test_supported_languages() {
    assert!(is_supported("de"));
    assert!(!is_supported("German"));
}
