use super::*;
use chrono::NaiveTime;
use habitual_core::model::Recurrence;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&BackendConfig {
        base_url: format!("{}/", server.uri()),
        timeout_secs: 5,
    })
    .unwrap()
}

fn habit_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": 1,
        "name": name,
        "start_date": "2026-10-01",
        "times_per_day": 2,
        "repeat_type": "weekly",
        "days_mask": 5
    })
}

#[tokio::test]
async fn test_get_user_by_chat_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/telegram"))
        .and(query_param("telegram_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "name": "Ana",
            "language": "es",
            "timezone": "Europe/Madrid",
            "telegram_account": {"telegram_id": 42}
        })))
        .mount(&server)
        .await;

    let user = backend(&server).await.get_user_by_chat(42).await.unwrap().unwrap();
    assert_eq!(user.id, 9);
    assert_eq!(user.chat_id(), Some(42));
    assert_eq!(user.language.as_deref(), Some("es"));
}

#[tokio::test]
async fn test_lookup_404_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/telegram"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(backend(&server).await.get_user_by_chat(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_server_error_is_collaborator_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/habits/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = backend(&server).await.get_habit(3).await.unwrap_err();
    assert!(matches!(err, BotError::CollaboratorUnavailable(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_collaborator_unavailable() {
    let backend = HttpBackend::new(&BackendConfig {
        base_url: "http://127.0.0.1:9".into(),
        timeout_secs: 1,
    })
    .unwrap();
    let err = backend.get_habit(1).await.unwrap_err();
    assert!(matches!(err, BotError::CollaboratorUnavailable(_)));
    assert!(!backend.health().await);
}

#[tokio::test]
async fn test_create_habit_sends_draft_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/habits"))
        .and(body_partial_json(json!({
            "user_id": 1,
            "name": "Run",
            "repeat_type": "weekly",
            "days_mask": 5,
            "times_per_day": 2
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(habit_json(77, "Run")))
        .expect(1)
        .mount(&server)
        .await;

    let mut draft = HabitDraft::new(NaiveDate::from_ymd_opt(2026, 10, 1));
    draft.name = Some("Run".into());
    draft.set_recurrence(Recurrence::Weekly);
    draft.days.set(2);
    draft
        .add_notification(NaiveTime::from_hms_opt(7, 0, 0).unwrap(), 10)
        .unwrap();
    draft
        .add_notification(NaiveTime::from_hms_opt(19, 0, 0).unwrap(), 10)
        .unwrap();

    let habit = backend(&server).await.create_habit(1, &draft).await.unwrap();
    assert_eq!(habit.id, 77);
    assert_eq!(habit.repeat_type, Recurrence::Weekly);
}

#[tokio::test]
async fn test_create_habit_notifications_posts_seconds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/habits/77/notifications"))
        .and(body_partial_json(json!({"times": [25200, 68400]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {"notification_id": 1, "habit_id": 77, "time_in_seconds": 25200},
            {"notification_id": 2, "habit_id": 77, "time_in_seconds": 68400}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let created = backend(&server)
        .await
        .create_habit_notifications(77, &[25200, 68400])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[1].time(), NaiveTime::from_hms_opt(19, 0, 0));
}

#[tokio::test]
async fn test_notifications_due_passes_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/notifications/for-period"))
        .and(query_param("span_secs", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"notification_id": 5, "habit_id": 2, "time_in_seconds": 3600, "user_id": 9, "habit_name": "Read"},
            {"habit_id": 3, "user_id": 9}
        ])))
        .mount(&server)
        .await;

    let from = DateTime::parse_from_rfc3339("2026-10-16T01:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let due = backend(&server).await.notifications_due(from, 12).await.unwrap();
    assert_eq!(due.len(), 2);
    assert_eq!(due[0].habit_name.as_deref(), Some("Read"));
    assert_eq!(due[1].time_in_seconds, None);
}

#[tokio::test]
async fn test_habits_for_date_404_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/habits/for-date"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let habits = backend(&server).await.habits_for_date(1, None).await.unwrap();
    assert!(habits.is_empty());
}

#[tokio::test]
async fn test_delete_and_event_accept_empty_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/habits/4"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/habit-events"))
        .and(body_partial_json(json!({"habit_id": 4, "notification_id": 8})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server).await;
    backend.delete_habit(4).await.unwrap();
    backend.record_habit_event(4, Some(8), Utc::now()).await.unwrap();
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    assert!(backend(&server).await.health().await);
}
