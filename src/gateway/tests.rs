use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use habitual_core::config::Config;
use habitual_core::message::IncomingEvent;

use super::*;
use crate::testing::{action, flush, text, FakeBackend, FakeChannel};

const CHAT: i64 = 31;
const USER: i64 = 9;

struct Rig {
    channel: Arc<FakeChannel>,
    backend: Arc<FakeBackend>,
    gateway: Arc<Gateway>,
}

impl Rig {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        let channel = Arc::new(FakeChannel::new());
        let backend = Arc::new(FakeBackend::new());
        let gateway = Arc::new(Gateway::new(&config, channel.clone(), backend.clone()));
        Self {
            channel,
            backend,
            gateway,
        }
    }

    fn registered() -> Self {
        let rig = Self::new();
        rig.backend
            .add_user(USER, CHAT, "Ana", Some("en"), Some("UTC"));
        rig
    }

    async fn send(&self, event: IncomingEvent) {
        self.gateway.dispatch(event).await;
    }

    /// Poll the chat's machine until it reaches `state` over `suspended`.
    async fn wait_for(&self, state: StateTag, suspended: &[StateTag]) -> bool {
        let poll = async {
            loop {
                if let Some(session) = self.gateway.sessions.get(CHAT) {
                    let machine = session.machine.lock().await;
                    if machine.state() == state && machine.suspended() == suspended {
                        return;
                    }
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), poll).await.is_ok()
    }

    async fn state(&self) -> StateTag {
        let session = self.gateway.sessions.get(CHAT).expect("session exists");
        let state = session.machine.lock().await.state();
        state
    }

    async fn shown(&self) -> String {
        let session = self.gateway.sessions.get(CHAT).expect("session exists");
        flush(&session.messenger).await;
        self.channel
            .last_shown(CHAT)
            .map(|m| m.text)
            .unwrap_or_default()
    }
}

#[test]
fn test_parse_commands() {
    assert_eq!(Command::parse("/start"), Some(Command::Start));
    assert_eq!(Command::parse("/add_habit"), Some(Command::AddHabit));
    assert_eq!(Command::parse("/today extra words"), Some(Command::Today));
    assert_eq!(Command::parse("/lang"), Some(Command::Language));
    assert_eq!(Command::parse("/tz"), Some(Command::Timezone));
    assert_eq!(
        Command::parse("/settings@habitual_bot"),
        Some(Command::Settings)
    );
    assert_eq!(Command::parse("/unknown"), None);
    assert_eq!(Command::parse("add_habit"), None);
    assert_eq!(Command::parse(""), None);
}

#[test]
fn test_command_targets() {
    assert_eq!(Command::Start.target(), None);
    assert_eq!(Command::Today.target(), Some(StateTag::TodaysNotifications));
    assert_eq!(Command::Language.target(), Some(StateTag::ChooseLanguage));
    assert_eq!(Command::MyHabits.target(), Some(StateTag::MyHabits));
}

#[test]
fn test_command_of_action_is_none() {
    assert_eq!(Command::of(&action(CHAT, "/help")), None);
    assert_eq!(Command::of(&text(CHAT, "/help")), Some(Command::Help));
}

#[tokio::test]
async fn test_unauthorized_chat_is_dropped() {
    let mut config = Config::default();
    config.telegram.allowed_users = vec![1];
    let rig = Rig::with_config(config);

    rig.send(text(CHAT, "/start")).await;

    assert_eq!(rig.gateway.sessions.session_count(), 0);
    assert!(rig.backend.users().is_empty());
}

#[tokio::test]
async fn test_start_registers_new_user() {
    let rig = Rig::new();
    rig.send(text(CHAT, "/start")).await;

    assert_eq!(rig.state().await, StateTag::ChooseLanguage);
    let users = rig.backend.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].chat_id(), Some(CHAT));
}

#[tokio::test]
async fn test_command_from_new_user_goes_through_registration() {
    let rig = Rig::new();
    rig.send(text(CHAT, "/add_habit")).await;

    assert_eq!(rig.state().await, StateTag::ChooseLanguage);
    assert_eq!(rig.backend.users().len(), 1);
}

#[tokio::test]
async fn test_command_switches_state_and_cleans_up() {
    let rig = Rig::registered();
    rig.send(text(CHAT, "/add_habit")).await;

    assert_eq!(rig.state().await, StateTag::AddHabit);
    assert!(rig.channel.deleted().contains(&1), "command message removed");
}

#[tokio::test]
async fn test_command_with_bot_suffix() {
    let rig = Rig::registered();
    rig.send(text(CHAT, "/settings@habitual_bot")).await;
    assert_eq!(rig.state().await, StateTag::Settings);
}

#[tokio::test]
async fn test_plain_text_is_not_cleaned_up() {
    let rig = Rig::registered();
    rig.send(text(CHAT, "hello")).await;

    assert_eq!(rig.state().await, StateTag::Help);
    assert!(rig.channel.deleted().is_empty());
}

#[tokio::test]
async fn test_unanswered_action_is_acknowledged() {
    let rig = Rig::registered();
    rig.send(text(CHAT, "/help")).await;
    rig.send(action(CHAT, "nothing:here")).await;

    assert!(rig
        .channel
        .answered()
        .contains(&("cb-nothing:here".to_string(), None)));
}

#[tokio::test]
async fn test_backend_down_during_setup() {
    let rig = Rig::registered();
    rig.backend.set_unavailable(true);
    rig.send(action(CHAT, "my:back")).await;

    assert_eq!(rig.state().await, StateTag::Init);
    assert!(rig.shown().await.contains("unavailable"));
    assert_eq!(rig.channel.answered().len(), 1);

    rig.backend.set_unavailable(false);
    rig.send(text(CHAT, "/help")).await;
    assert_eq!(rig.state().await, StateTag::Help);
}

#[tokio::test]
async fn test_last_event_and_sender_are_recorded() {
    let rig = Rig::registered();
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let mut event = text(CHAT, "/help");
    if let IncomingEvent::Text(msg) = &mut event {
        msg.timestamp = at;
        msg.sender_name = Some("Ana B".into());
    }
    rig.send(event).await;

    let session = rig.gateway.sessions.get(CHAT).unwrap();
    let profile = session.profile();
    assert_eq!(profile.last_event, at);
    assert_eq!(profile.username.as_deref(), Some("Ana B"));
    assert_eq!(profile.backend_id, Some(USER));
}

#[tokio::test]
async fn test_routed_events_of_one_chat_keep_arrival_order() {
    let rig = Rig::registered();
    for command in ["/settings", "/my_habits", "/help"] {
        rig.gateway.route(text(CHAT, command));
    }

    // Only in-order handling leaves Help on top of [Settings, MyHabits].
    assert!(
        rig.wait_for(StateTag::Help, &[StateTag::Settings, StateTag::MyHabits])
            .await
    );
    assert_eq!(rig.gateway.workers.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_dispatch_future_is_send() {
    fn assert_send<T: Send>(_: &T) {}
    let rig = Rig::registered();
    let dispatch = rig.gateway.dispatch(text(CHAT, "/settings"));
    assert_send(&dispatch);
    dispatch.await;
    assert_eq!(rig.state().await, StateTag::Settings);
}
