use super::*;

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.messenger.batch_size, 30);
    assert_eq!(cfg.messenger.period_ms, 1000);
    assert_eq!(cfg.notificator.period_secs, 10);
    assert_eq!(cfg.notificator.overlap_secs, 2);
    assert_eq!(cfg.wizard.max_notifications, 10);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_parse_partial_sections() {
    let cfg = parse(
        r#"
        [telegram]
        enabled = true
        bot_token = "abc"
        allowed_users = [42]

        [backend]
        base_url = "http://habits:9000"
        "#,
    )
    .unwrap();
    assert!(cfg.telegram.enabled);
    assert!(cfg.telegram.is_allowed(42));
    assert!(!cfg.telegram.is_allowed(7));
    assert_eq!(cfg.backend.base_url, "http://habits:9000");
    assert_eq!(cfg.backend.timeout_secs, 10);
    assert_eq!(cfg.bot.log_level, "info");
}

#[test]
fn test_empty_allow_list_allows_everyone() {
    assert!(TelegramConfig::default().is_allowed(123));
}

#[test]
fn test_overlap_must_be_below_period() {
    let err = parse(
        r#"
        [notificator]
        period_secs = 5
        overlap_secs = 5
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, BotError::Config(_)));

    assert!(parse("[notificator]\nperiod_secs = 5\noverlap_secs = 4\n").is_ok());
}

#[test]
fn test_malformed_toml_is_config_error() {
    assert!(matches!(parse("[bot\nname = 1"), Err(BotError::Config(_))));
}

#[test]
fn test_overrides_replace_non_empty_values() {
    let mut cfg = Config::default();
    cfg.apply_overrides(Some("token".into()), Some(String::new()));
    assert_eq!(cfg.telegram.bot_token, "token");
    assert_eq!(cfg.backend.base_url, "http://localhost:8000");
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/habitual.toml").unwrap();
    assert_eq!(cfg.bot.name, "Habitual");
}
