//! JSON-over-HTTP client for the habit service.
//!
//! Every path lives under `{base_url}/v1`. A 404 on a lookup means "no such
//! record"; every other failure is reported as
//! [`BotError::CollaboratorUnavailable`].

mod wire;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use habitual_core::{
    config::BackendConfig,
    error::BotError,
    model::{Habit, HabitDraft, HabitStatistics, Notification, OverallProgress, User, UserUpdate},
    traits::BackendRepository,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use wire::{HabitBody, HabitEventBody, NotificationsBody, SignupBody};

/// Habit service client.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BotError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BotError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            base_url: format!("{}/v1", config.base_url.trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}/{path}", self.base_url))
    }

    /// Send a request and decode a JSON body. 404 yields `None`.
    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Option<T>, BotError> {
        let resp = req.send().await.map_err(unavailable)?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("habit service returned {status}: {body}");
            return Err(BotError::CollaboratorUnavailable(format!(
                "habit service returned {status}"
            )));
        }
        resp.json::<T>().await.map(Some).map_err(unavailable)
    }

    /// Like [`fetch`](Self::fetch) but a missing record is an error.
    async fn fetch_required<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        what: &str,
    ) -> Result<T, BotError> {
        self.fetch(req).await?.ok_or_else(|| {
            BotError::CollaboratorUnavailable(format!("habit service has no {what}"))
        })
    }

    async fn get_opt<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Option<T>, BotError> {
        debug!("GET {path}");
        self.fetch(self.request(Method::GET, path).query(query)).await
    }

    /// GET a list; a 404 is an empty list.
    async fn get_list<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Vec<T>, BotError> {
        Ok(self.get_opt(path, query).await?.unwrap_or_default())
    }

    /// Send a request whose response body is ignored. 404 counts as success.
    async fn send_ignoring_body(&self, req: RequestBuilder) -> Result<(), BotError> {
        let resp = req.send().await.map_err(unavailable)?;
        let status = resp.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(BotError::CollaboratorUnavailable(format!(
                "habit service returned {status}"
            )))
        }
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, BotError> {
        debug!("{method} {path}");
        self.fetch_required(self.request(method, path).json(body), path).await
    }
}

fn unavailable(e: reqwest::Error) -> BotError {
    BotError::CollaboratorUnavailable(format!("habit service request failed: {e}"))
}

#[async_trait]
impl BackendRepository for HttpBackend {
    async fn get_user_by_chat(&self, chat_id: i64) -> Result<Option<User>, BotError> {
        self.get_opt("users/telegram", &[("telegram_id", chat_id)]).await
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, BotError> {
        self.fetch(self.request(Method::GET, &format!("users/{user_id}")))
            .await
    }

    async fn register_user(
        &self,
        chat_id: i64,
        name: &str,
        language: &str,
        timezone: &str,
    ) -> Result<User, BotError> {
        let body = SignupBody {
            name,
            telegram_id: chat_id,
            language,
            timezone,
        };
        self.send_json(Method::POST, "auth/signup-telegram", &body).await
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<User, BotError> {
        self.send_json(Method::PATCH, "users", update).await
    }

    async fn get_habit_by_name(&self, user_id: i64, name: &str) -> Result<Option<Habit>, BotError> {
        let user_id = user_id.to_string();
        self.get_opt("habits/by-name", &[("user_id", user_id.as_str()), ("name", name)])
            .await
    }

    async fn get_habit(&self, habit_id: i64) -> Result<Option<Habit>, BotError> {
        self.fetch(self.request(Method::GET, &format!("habits/{habit_id}")))
            .await
    }

    async fn create_habit(&self, user_id: i64, draft: &HabitDraft) -> Result<Habit, BotError> {
        let body = HabitBody {
            user_id: Some(user_id),
            ..HabitBody::from_draft(draft)
        };
        self.send_json(Method::POST, "habits", &body).await
    }

    async fn update_habit(&self, habit_id: i64, draft: &HabitDraft) -> Result<Habit, BotError> {
        let body = HabitBody {
            id: Some(habit_id),
            ..HabitBody::from_draft(draft)
        };
        self.send_json(Method::PATCH, "habits", &body).await
    }

    async fn delete_habit(&self, habit_id: i64) -> Result<(), BotError> {
        let path = format!("habits/{habit_id}");
        debug!("DELETE {path}");
        self.send_ignoring_body(self.request(Method::DELETE, &path))
            .await
    }

    async fn habits_for_date(
        &self,
        user_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Habit>, BotError> {
        let mut query = vec![("user_id", user_id.to_string())];
        if let Some(date) = date {
            query.push(("date", date.to_string()));
        }
        self.get_list("habits/for-date", &query).await
    }

    async fn record_habit_event(
        &self,
        habit_id: i64,
        notification_id: Option<i64>,
        at: DateTime<Utc>,
    ) -> Result<(), BotError> {
        let body = HabitEventBody {
            habit_id,
            notification_id,
            timestamp: at,
        };
        debug!("POST habit-events");
        self.send_ignoring_body(self.request(Method::POST, "habit-events").json(&body))
            .await
    }

    async fn habit_notifications(&self, habit_id: i64) -> Result<Vec<Notification>, BotError> {
        let req = self.request(Method::GET, &format!("habits/{habit_id}/notifications"));
        Ok(self.fetch(req).await?.unwrap_or_default())
    }

    async fn create_habit_notifications(
        &self,
        habit_id: i64,
        times: &[i64],
    ) -> Result<Vec<Notification>, BotError> {
        self.send_json(
            Method::POST,
            &format!("habits/{habit_id}/notifications"),
            &NotificationsBody { times },
        )
        .await
    }

    async fn notifications_due(
        &self,
        from: DateTime<Utc>,
        span_secs: i64,
    ) -> Result<Vec<Notification>, BotError> {
        let query = [
            ("from", from.to_rfc3339()),
            ("span_secs", span_secs.to_string()),
        ];
        self.get_list("notifications/for-period", &query).await
    }

    async fn todays_notifications(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Notification>, BotError> {
        let query = [("user_id", user_id.to_string()), ("date", date.to_string())];
        self.get_list("notifications/today", &query).await
    }

    async fn habit_statistics(
        &self,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<HabitStatistics, BotError> {
        let query = [("habit_id", habit_id.to_string()), ("date", date.to_string())];
        self.fetch_required(
            self.request(Method::GET, "statistics/habit").query(&query),
            "habit statistics",
        )
        .await
    }

    async fn overall_statistics(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<OverallProgress, BotError> {
        let query = [("user_id", user_id.to_string()), ("date", date.to_string())];
        self.fetch_required(
            self.request(Method::GET, "statistics/overall").query(&query),
            "overall statistics",
        )
        .await
    }

    async fn health(&self) -> bool {
        match self.request(Method::GET, "health").send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("habit service health check failed: {e}");
                false
            }
        }
    }
}
