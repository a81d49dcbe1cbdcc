//! Per-chat sessions and the registry that owns them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use habitual_core::{
    error::BotError,
    time::{local_date, parse_timezone, DEFAULT_TIMEZONE},
    traits::{BackendRepository, Channel},
};
use tracing::{debug, info};

use crate::i18n::DEFAULT_LANGUAGE;
use crate::machine::{StateMachine, StateRegistry, StateTag};
use crate::messenger::Messenger;
use crate::messenger_queue::MessengerQueue;

/// What the bot knows about the person behind a chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub language: String,
    pub timezone: String,
    /// Habit service user id; `None` until registered.
    pub backend_id: Option<i64>,
    pub last_event: DateTime<Utc>,
    /// Whether the profile was loaded from the habit service.
    pub initialized: bool,
    pub username: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            backend_id: None,
            last_event: Utc::now(),
            initialized: false,
            username: None,
        }
    }
}

impl Profile {
    pub fn tz(&self) -> Tz {
        parse_timezone(&self.timezone)
    }

    /// Local date of the last inbound event.
    pub fn last_event_date(&self) -> NaiveDate {
        local_date(self.tz(), self.last_event)
    }

    /// Local date right now.
    pub fn today(&self) -> NaiveDate {
        local_date(self.tz(), Utc::now())
    }
}

pub struct Session {
    pub chat_id: i64,
    pub messenger: Arc<Messenger>,
    profile: Mutex<Profile>,
    /// Locked for the whole handling of one event.
    pub machine: tokio::sync::Mutex<StateMachine>,
}

impl Session {
    pub fn new(chat_id: i64, messenger: Arc<Messenger>, machine: StateMachine) -> Self {
        Self {
            chat_id,
            messenger,
            profile: Mutex::new(Profile::default()),
            machine: tokio::sync::Mutex::new(machine),
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn update_profile(&self, f: impl FnOnce(&mut Profile)) {
        let mut profile = self.profile.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut profile);
    }
}

/// Owns every live session, keyed by chat id.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<i64, Arc<Session>>>,
    states: Arc<StateRegistry>,
    channel: Arc<dyn Channel>,
    backend: Arc<dyn BackendRepository>,
    queue: Arc<MessengerQueue>,
}

impl SessionRegistry {
    pub fn new(
        states: Arc<StateRegistry>,
        channel: Arc<dyn Channel>,
        backend: Arc<dyn BackendRepository>,
        queue: Arc<MessengerQueue>,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            states,
            channel,
            backend,
            queue,
        }
    }

    pub fn get(&self, chat_id: i64) -> Option<Arc<Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&chat_id)
            .cloned()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Look up a session, creating it (and registering its messenger with the
    /// queue) on first contact.
    pub fn get_or_create(&self, chat_id: i64) -> Result<Arc<Session>, BotError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(session) = sessions.get(&chat_id) {
            return Ok(session.clone());
        }
        let messenger = Arc::new(Messenger::new(chat_id, self.channel.clone()));
        let machine = StateMachine::new(self.states.clone(), StateTag::Init)?;
        let session = Arc::new(Session::new(chat_id, messenger.clone(), machine));
        sessions.insert(chat_id, session.clone());
        drop(sessions);

        self.queue.register(messenger);
        debug!("created session for chat {chat_id}");
        Ok(session)
    }

    /// Load the profile from the habit service unless already done.
    pub async fn setup(&self, session: &Session) -> Result<(), BotError> {
        if session.profile().initialized {
            return Ok(());
        }
        let user = self.backend.get_user_by_chat(session.chat_id).await?;
        session.update_profile(|p| {
            p.initialized = true;
            if let Some(user) = user {
                p.backend_id = Some(user.id);
                p.username = Some(user.name);
                if let Some(lang) = user.language {
                    p.language = lang;
                }
                if let Some(tz) = user.timezone {
                    p.timezone = tz;
                }
            }
        });
        info!(
            "chat {}: session ready (registered: {})",
            session.chat_id,
            session.profile().backend_id.is_some()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_registry, FakeBackend, FakeChannel};

    fn registry(backend: Arc<FakeBackend>) -> (SessionRegistry, Arc<MessengerQueue>) {
        let queue = Arc::new(MessengerQueue::new(30, 1000));
        let reg = SessionRegistry::new(
            Arc::new(test_registry()),
            Arc::new(FakeChannel::new()),
            backend,
            queue.clone(),
        );
        (reg, queue)
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent_and_registers_messenger() {
        let (reg, queue) = registry(Arc::new(FakeBackend::new()));
        let a = reg.get_or_create(5).unwrap();
        let b = reg.get_or_create(5).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(reg.session_count(), 1);
        assert_eq!(queue.messenger_count(), 1);
        assert_eq!(a.machine.lock().await.state(), StateTag::Init);
    }

    #[tokio::test]
    async fn test_setup_loads_registered_user() {
        let backend = Arc::new(FakeBackend::new());
        backend.add_user(11, 5, "Ana", Some("de"), Some("Europe/Berlin"));
        let (reg, _) = registry(backend);
        let session = reg.get_or_create(5).unwrap();
        reg.setup(&session).await.unwrap();

        let profile = session.profile();
        assert!(profile.initialized);
        assert_eq!(profile.backend_id, Some(11));
        assert_eq!(profile.language, "de");
        assert_eq!(profile.timezone, "Europe/Berlin");
    }

    #[tokio::test]
    async fn test_setup_unknown_user_stays_unregistered() {
        let (reg, _) = registry(Arc::new(FakeBackend::new()));
        let session = reg.get_or_create(9).unwrap();
        reg.setup(&session).await.unwrap();
        let profile = session.profile();
        assert!(profile.initialized);
        assert_eq!(profile.backend_id, None);
        assert_eq!(profile.language, DEFAULT_LANGUAGE);
    }

    #[tokio::test]
    async fn test_setup_failure_leaves_session_uninitialized() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_unavailable(true);
        let (reg, _) = registry(backend);
        let session = reg.get_or_create(9).unwrap();
        assert!(reg.setup(&session).await.is_err());
        assert!(!session.profile().initialized);
    }
}
