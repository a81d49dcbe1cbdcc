//! In-memory fakes of the messaging gateway and the habit service.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use habitual_core::{
    config::WizardConfig,
    error::{BotError, DeliveryError},
    message::{
        ContentType, IncomingEvent, Keyboard, MenuCommand, PlainText, StructuredAction,
    },
    model::{
        Habit, HabitDraft, HabitStatistics, Notification, OverallProgress, TelegramAccount, User,
        UserUpdate,
    },
    traits::{BackendRepository, Channel},
};
use tokio::sync::mpsc;

use crate::machine::{Services, StateContext, StateMachine, StateRegistry, StateTag};
use crate::messenger::Messenger;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub chat_id: i64,
    pub id: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

#[derive(Default)]
struct ChannelLog {
    next_id: i64,
    sent: Vec<Outbound>,
    edits: Vec<Outbound>,
    timeline: Vec<Outbound>,
    deleted: Vec<i64>,
    answered: Vec<(String, Option<String>)>,
    commands: Vec<(i64, Vec<MenuCommand>)>,
    next_edit_error: Option<DeliveryError>,
    failing_deletes: HashSet<i64>,
    failing_chats: HashSet<i64>,
}

/// Records every outbound call; failures are scripted per test.
#[derive(Default)]
pub struct FakeChannel {
    log: Mutex<ChannelLog>,
}

impl FakeChannel {
    pub fn new() -> Self {
        let channel = Self::default();
        channel.log.lock().unwrap().next_id = 1000;
        channel
    }

    pub fn sent(&self) -> Vec<Outbound> {
        self.log.lock().unwrap().sent.clone()
    }

    pub fn edits(&self) -> Vec<Outbound> {
        self.log.lock().unwrap().edits.clone()
    }

    pub fn deleted(&self) -> Vec<i64> {
        self.log.lock().unwrap().deleted.clone()
    }

    pub fn answered(&self) -> Vec<(String, Option<String>)> {
        self.log.lock().unwrap().answered.clone()
    }

    pub fn commands(&self) -> Vec<(i64, Vec<MenuCommand>)> {
        self.log.lock().unwrap().commands.clone()
    }

    /// Latest text shown in `chat`, sent or edited.
    pub fn last_shown(&self, chat_id: i64) -> Option<Outbound> {
        self.log
            .lock()
            .unwrap()
            .timeline
            .iter()
            .rev()
            .find(|o| o.chat_id == chat_id)
            .cloned()
    }

    pub fn fail_next_edit(&self, error: DeliveryError) {
        self.log.lock().unwrap().next_edit_error = Some(error);
    }

    pub fn fail_delete(&self, message_id: i64) {
        self.log.lock().unwrap().failing_deletes.insert(message_id);
    }

    pub fn fail_sends_to(&self, chat_id: i64) {
        self.log.lock().unwrap().failing_chats.insert(chat_id);
    }
}

#[async_trait]
impl Channel for FakeChannel {
    fn name(&self) -> &str {
        "fake"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingEvent>, BotError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, DeliveryError> {
        let mut log = self.log.lock().unwrap();
        if log.failing_chats.contains(&chat_id) {
            return Err(DeliveryError::Other("blocked by user".into()));
        }
        log.next_id += 1;
        let out = Outbound {
            chat_id,
            id: log.next_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        };
        log.sent.push(out.clone());
        log.timeline.push(out);
        Ok(log.next_id)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), DeliveryError> {
        let mut log = self.log.lock().unwrap();
        if let Some(e) = log.next_edit_error.take() {
            return Err(e);
        }
        let out = Outbound {
            chat_id,
            id: message_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        };
        log.edits.push(out.clone());
        log.timeline.push(out);
        Ok(())
    }

    async fn delete_message(&self, _chat_id: i64, message_id: i64) -> Result<(), DeliveryError> {
        let mut log = self.log.lock().unwrap();
        if log.failing_deletes.contains(&message_id) {
            return Err(DeliveryError::Other("message can't be deleted".into()));
        }
        log.deleted.push(message_id);
        Ok(())
    }

    async fn answer_action(&self, action_id: &str, text: Option<&str>) -> Result<(), DeliveryError> {
        self.log
            .lock()
            .unwrap()
            .answered
            .push((action_id.to_string(), text.map(str::to_string)));
        Ok(())
    }

    async fn set_commands(
        &self,
        chat_id: i64,
        commands: &[MenuCommand],
    ) -> Result<(), DeliveryError> {
        self.log
            .lock()
            .unwrap()
            .commands
            .push((chat_id, commands.to_vec()));
        Ok(())
    }

    async fn stop(&self) -> Result<(), BotError> {
        Ok(())
    }
}

#[derive(Default)]
struct BackendData {
    next_id: i64,
    users: HashMap<i64, User>,
    habits: HashMap<i64, Habit>,
    notifications: HashMap<i64, Vec<Notification>>,
    due: Vec<Notification>,
    todays: Vec<Notification>,
    events: Vec<(i64, Option<i64>)>,
    due_requests: Vec<(DateTime<Utc>, i64)>,
    user_lookups: usize,
    unavailable: bool,
}

/// Habit service kept in memory.
#[derive(Default)]
pub struct FakeBackend {
    data: Mutex<BackendData>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.data.lock().unwrap().next_id = 100;
        backend
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.data.lock().unwrap().unavailable = unavailable;
    }

    pub fn add_user(
        &self,
        id: i64,
        chat_id: i64,
        name: &str,
        language: Option<&str>,
        timezone: Option<&str>,
    ) {
        self.data.lock().unwrap().users.insert(
            id,
            User {
                id,
                name: name.to_string(),
                language: language.map(str::to_string),
                timezone: timezone.map(str::to_string),
                telegram_account: Some(TelegramAccount {
                    telegram_id: chat_id,
                }),
            },
        );
    }

    pub fn user(&self, id: i64) -> Option<User> {
        self.data.lock().unwrap().users.get(&id).cloned()
    }

    pub fn users(&self) -> Vec<User> {
        self.data.lock().unwrap().users.values().cloned().collect()
    }

    pub fn add_habit(&self, user_id: i64, name: &str) -> i64 {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        let id = data.next_id;
        data.habits.insert(
            id,
            Habit {
                id,
                user_id,
                name: name.to_string(),
                description: None,
                start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                end_date: None,
                times_per_day: 1,
                repeat_type: Default::default(),
                days_mask: Default::default(),
                created_at: None,
            },
        );
        id
    }

    pub fn habit(&self, id: i64) -> Option<Habit> {
        self.data.lock().unwrap().habits.get(&id).cloned()
    }

    pub fn habits(&self) -> Vec<Habit> {
        let mut habits: Vec<_> = self.data.lock().unwrap().habits.values().cloned().collect();
        habits.sort_by_key(|h| h.id);
        habits
    }

    pub fn set_notifications(&self, habit_id: i64, seconds: &[i64]) {
        let list = seconds
            .iter()
            .enumerate()
            .map(|(i, s)| Notification {
                notification_id: Some(i as i64 + 1),
                habit_id,
                time_in_seconds: Some(*s),
                user_id: None,
                habit_name: None,
            })
            .collect();
        self.data.lock().unwrap().notifications.insert(habit_id, list);
    }

    pub fn notifications_of(&self, habit_id: i64) -> Vec<Notification> {
        self.data
            .lock()
            .unwrap()
            .notifications
            .get(&habit_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_due(&self, due: Vec<Notification>) {
        self.data.lock().unwrap().due = due;
    }

    pub fn due_requests(&self) -> Vec<(DateTime<Utc>, i64)> {
        self.data.lock().unwrap().due_requests.clone()
    }

    pub fn set_todays(&self, todays: Vec<Notification>) {
        self.data.lock().unwrap().todays = todays;
    }

    pub fn events(&self) -> Vec<(i64, Option<i64>)> {
        self.data.lock().unwrap().events.clone()
    }

    pub fn user_lookups(&self) -> usize {
        self.data.lock().unwrap().user_lookups
    }

    fn check(&self) -> Result<std::sync::MutexGuard<'_, BackendData>, BotError> {
        let data = self.data.lock().unwrap();
        if data.unavailable {
            return Err(BotError::CollaboratorUnavailable("fake backend down".into()));
        }
        Ok(data)
    }
}

fn apply_draft(habit: &mut Habit, draft: &HabitDraft) {
    if let Some(ref name) = draft.name {
        habit.name = name.clone();
    }
    habit.description = draft.description.clone();
    if let Some(start) = draft.start_date {
        habit.start_date = start;
    }
    habit.end_date = draft.end_date;
    habit.times_per_day = draft.times_per_day.unwrap_or(1);
    habit.repeat_type = draft.recurrence;
    habit.days_mask = draft.days;
}

#[async_trait]
impl BackendRepository for FakeBackend {
    async fn get_user_by_chat(&self, chat_id: i64) -> Result<Option<User>, BotError> {
        let mut data = self.check()?;
        data.user_lookups += 1;
        Ok(data
            .users
            .values()
            .find(|u| u.chat_id() == Some(chat_id))
            .cloned())
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, BotError> {
        let mut data = self.check()?;
        data.user_lookups += 1;
        Ok(data.users.get(&user_id).cloned())
    }

    async fn register_user(
        &self,
        chat_id: i64,
        name: &str,
        language: &str,
        timezone: &str,
    ) -> Result<User, BotError> {
        let mut data = self.check()?;
        data.next_id += 1;
        let user = User {
            id: data.next_id,
            name: name.to_string(),
            language: Some(language.to_string()),
            timezone: Some(timezone.to_string()),
            telegram_account: Some(TelegramAccount {
                telegram_id: chat_id,
            }),
        };
        data.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<User, BotError> {
        let mut data = self.check()?;
        let user = data
            .users
            .get_mut(&update.id)
            .ok_or_else(|| BotError::CollaboratorUnavailable("no such user".into()))?;
        if let Some(ref lang) = update.language {
            user.language = Some(lang.clone());
        }
        if let Some(ref tz) = update.timezone {
            user.timezone = Some(tz.clone());
        }
        Ok(user.clone())
    }

    async fn get_habit_by_name(&self, user_id: i64, name: &str) -> Result<Option<Habit>, BotError> {
        let data = self.check()?;
        Ok(data
            .habits
            .values()
            .find(|h| h.user_id == user_id && h.name == name)
            .cloned())
    }

    async fn get_habit(&self, habit_id: i64) -> Result<Option<Habit>, BotError> {
        Ok(self.check()?.habits.get(&habit_id).cloned())
    }

    async fn create_habit(&self, user_id: i64, draft: &HabitDraft) -> Result<Habit, BotError> {
        let mut data = self.check()?;
        data.next_id += 1;
        let mut habit = Habit {
            id: data.next_id,
            user_id,
            name: String::new(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: None,
            times_per_day: 1,
            repeat_type: Default::default(),
            days_mask: Default::default(),
            created_at: Some(Utc::now()),
        };
        apply_draft(&mut habit, draft);
        data.habits.insert(habit.id, habit.clone());
        Ok(habit)
    }

    async fn update_habit(&self, habit_id: i64, draft: &HabitDraft) -> Result<Habit, BotError> {
        let mut data = self.check()?;
        let habit = data
            .habits
            .get_mut(&habit_id)
            .ok_or_else(|| BotError::CollaboratorUnavailable("no such habit".into()))?;
        apply_draft(habit, draft);
        Ok(habit.clone())
    }

    async fn delete_habit(&self, habit_id: i64) -> Result<(), BotError> {
        let mut data = self.check()?;
        data.habits.remove(&habit_id);
        data.notifications.remove(&habit_id);
        Ok(())
    }

    async fn habits_for_date(
        &self,
        user_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Habit>, BotError> {
        let data = self.check()?;
        let mut habits: Vec<Habit> = data
            .habits
            .values()
            .filter(|h| h.user_id == user_id)
            .filter(|h| match date {
                Some(d) => h.days_mask.matches(h.repeat_type, d),
                None => true,
            })
            .cloned()
            .collect();
        habits.sort_by_key(|h| h.id);
        Ok(habits)
    }

    async fn record_habit_event(
        &self,
        habit_id: i64,
        notification_id: Option<i64>,
        _at: DateTime<Utc>,
    ) -> Result<(), BotError> {
        self.check()?.events.push((habit_id, notification_id));
        Ok(())
    }

    async fn habit_notifications(&self, habit_id: i64) -> Result<Vec<Notification>, BotError> {
        Ok(self
            .check()?
            .notifications
            .get(&habit_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_habit_notifications(
        &self,
        habit_id: i64,
        times: &[i64],
    ) -> Result<Vec<Notification>, BotError> {
        drop(self.check()?);
        self.set_notifications(habit_id, times);
        Ok(self.notifications_of(habit_id))
    }

    async fn notifications_due(
        &self,
        from: DateTime<Utc>,
        span_secs: i64,
    ) -> Result<Vec<Notification>, BotError> {
        let mut data = self.check()?;
        data.due_requests.push((from, span_secs));
        // Times of day are UTC; a window may cross midnight.
        let start = i64::from(from.num_seconds_from_midnight());
        Ok(data
            .due
            .iter()
            .filter(|n| {
                n.time_in_seconds
                    .is_some_and(|t| (t - start).rem_euclid(86_400) <= span_secs)
            })
            .cloned()
            .collect())
    }

    async fn todays_notifications(
        &self,
        _user_id: i64,
        _date: NaiveDate,
    ) -> Result<Vec<Notification>, BotError> {
        Ok(self.check()?.todays.clone())
    }

    async fn habit_statistics(
        &self,
        habit_id: i64,
        _date: NaiveDate,
    ) -> Result<HabitStatistics, BotError> {
        let data = self.check()?;
        let done = data.events.iter().filter(|(h, _)| *h == habit_id).count() as u32;
        Ok(HabitStatistics {
            habit_id,
            today_done: done,
            today_expected: 1,
            total_completed: done,
            total_expected: 10,
            percent_complete: f64::from(done) * 10.0,
            current_streak: done,
        })
    }

    async fn overall_statistics(
        &self,
        user_id: i64,
        _date: NaiveDate,
    ) -> Result<OverallProgress, BotError> {
        let data = self.check()?;
        let habit_count = data.habits.values().filter(|h| h.user_id == user_id).count() as u32;
        Ok(OverallProgress {
            habit_count,
            today_done: data.events.len() as u32,
            today_expected: habit_count,
            ..Default::default()
        })
    }

    async fn health(&self) -> bool {
        !self.data.lock().unwrap().unavailable
    }
}

pub fn limits() -> WizardConfig {
    WizardConfig::default()
}

pub fn services(channel: &Arc<FakeChannel>, backend: &Arc<FakeBackend>) -> Arc<Services> {
    Arc::new(Services {
        backend: backend.clone(),
        channel: channel.clone(),
        limits: limits(),
    })
}

/// The production state registry.
pub fn test_registry() -> StateRegistry {
    crate::states::registry()
}

/// A session with an initialized profile. `backend_id` marks it registered.
pub fn session(chat_id: i64, channel: &Arc<FakeChannel>, backend_id: Option<i64>) -> Arc<Session> {
    let messenger = Arc::new(Messenger::new(chat_id, channel.clone()));
    let machine = StateMachine::new(Arc::new(test_registry()), StateTag::Init)
        .expect("init state registered");
    let session = Arc::new(Session::new(chat_id, messenger, machine));
    session.update_profile(|p| {
        p.initialized = true;
        p.backend_id = backend_id;
    });
    session
}

pub fn context(session: &Arc<Session>, services: &Arc<Services>) -> StateContext {
    StateContext::new(session.clone(), services.clone())
}

pub fn text(chat_id: i64, text: &str) -> IncomingEvent {
    IncomingEvent::Text(PlainText {
        chat_id,
        message_id: 1,
        sender_name: Some("Ana".into()),
        text: text.to_string(),
        content_type: ContentType::Text,
        timestamp: Utc::now(),
    })
}

pub fn action(chat_id: i64, data: &str) -> IncomingEvent {
    IncomingEvent::Action(StructuredAction {
        id: format!("cb-{data}"),
        chat_id,
        sender_name: Some("Ana".into()),
        data: data.to_string(),
        timestamp: Utc::now(),
    })
}

/// Apply every queued main-message update.
pub async fn flush(messenger: &Messenger) {
    while messenger.process_message().await.unwrap_or(false) {}
}
