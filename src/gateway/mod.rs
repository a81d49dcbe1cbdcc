//! Inbound pipeline: channel events in, per-session state machines driven.
//!
//! Also owns the two background loops: the messenger queue that delivers
//! outbound updates and the notificator that pushes reminders.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::Command;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use habitual_core::{
    config::{Config, TelegramConfig},
    message::IncomingEvent,
    traits::{BackendRepository, Channel},
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::i18n::t;
use crate::machine::{Services, StateArgs, StateContext, StateTag, SwitchOutcome};
use crate::messenger_queue::MessengerQueue;
use crate::notificator::Notificator;
use crate::session::SessionRegistry;
use crate::states;

pub struct Gateway {
    channel: Arc<dyn Channel>,
    auth: TelegramConfig,
    services: Arc<Services>,
    sessions: Arc<SessionRegistry>,
    queue: Arc<MessengerQueue>,
    notificator: Option<Arc<Notificator>>,
    /// Per-chat ordered event queues.
    workers: Mutex<HashMap<i64, mpsc::UnboundedSender<IncomingEvent>>>,
}

impl Gateway {
    pub fn new(
        config: &Config,
        channel: Arc<dyn Channel>,
        backend: Arc<dyn BackendRepository>,
    ) -> Self {
        let queue = Arc::new(MessengerQueue::new(
            config.messenger.batch_size,
            config.messenger.period_ms,
        ));
        let sessions = Arc::new(SessionRegistry::new(
            Arc::new(states::registry()),
            channel.clone(),
            backend.clone(),
            queue.clone(),
        ));
        let services = Arc::new(Services {
            backend: backend.clone(),
            channel: channel.clone(),
            limits: config.wizard.clone(),
        });
        let notificator = config.notificator.enabled.then(|| {
            Arc::new(Notificator::new(
                backend,
                sessions.clone(),
                config.notificator.period_secs,
                config.notificator.overlap_secs,
            ))
        });
        Self {
            channel,
            auth: config.telegram.clone(),
            services,
            sessions,
            queue,
            notificator,
            workers: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop until ctrl-c or the channel closes.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Habitual gateway running | channel: {} | auth: {} | reminders: {}",
            self.channel.name(),
            if self.auth.allowed_users.is_empty() {
                "open"
            } else {
                "allowlist"
            },
            if self.notificator.is_some() {
                "on"
            } else {
                "off"
            },
        );

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name()))?;

        let queue_handle = tokio::spawn(self.queue.clone().run());
        let notificator_handle = self
            .notificator
            .clone()
            .map(|n| tokio::spawn(n.run()));

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => self.route(event),
                    None => {
                        warn!("channel {} closed its event stream", self.channel.name());
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        info!("Shutting down...");
        // Dropping the senders lets each chat worker drain and exit.
        self.workers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.queue.stop();
        queue_handle.abort();
        if let Some(notificator) = &self.notificator {
            notificator.stop();
        }
        if let Some(handle) = notificator_handle {
            handle.abort();
        }
        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }
        info!("Shutdown complete.");
        Ok(())
    }

    /// Queue an event on its chat's worker, starting the worker on first
    /// contact. Each chat is handled in arrival order; chats run concurrently.
    fn route(self: &Arc<Self>, event: IncomingEvent) {
        let chat_id = event.chat_id();
        let mut workers = self.workers.lock().unwrap_or_else(|e| e.into_inner());
        let tx = workers.entry(chat_id).or_insert_with(|| {
            let (tx, mut rx) = mpsc::unbounded_channel::<IncomingEvent>();
            let gw = self.clone();
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    gw.dispatch(event).await;
                }
            });
            tx
        });
        if tx.send(event).is_err() {
            warn!("chat {chat_id}: worker gone, dropping event");
            workers.remove(&chat_id);
        }
    }

    /// Route one inbound event through its session.
    ///
    /// Events of one chat are serialized on the session's state machine lock.
    pub async fn dispatch(&self, event: IncomingEvent) {
        let chat_id = event.chat_id();
        if !self.auth.is_allowed(chat_id) {
            warn!("dropping event from unauthorized chat {chat_id}");
            return;
        }

        let session = match self.sessions.get_or_create(chat_id) {
            Ok(session) => session,
            Err(e) => {
                error!("chat {chat_id}: cannot create session: {e}");
                return;
            }
        };
        let ctx = StateContext::new(session.clone(), self.services.clone());
        let mut machine = session.machine.lock().await;

        if let Err(e) = self.sessions.setup(&session).await {
            error!("chat {chat_id}: loading profile failed: {e}");
            session
                .messenger
                .update_main_message(t("service_unavailable", &ctx.lang()), None);
            if let IncomingEvent::Action(action) = &event {
                ctx.answer(action, None).await;
            }
            return;
        }

        session.update_profile(|p| {
            p.last_event = event.timestamp();
            if let Some(name) = event.sender_name() {
                p.username = Some(name.to_string());
            }
        });
        if let IncomingEvent::Text(msg) = &event {
            session.messenger.register_recv_message(msg.message_id).await;
        }

        let command = Command::of(&event);
        let result = match command.and_then(Command::target) {
            None => machine.handle(&ctx, &event).await,
            Some(tag) => {
                debug!("chat {chat_id}: command {command:?} -> {tag}");
                let switched = machine.set_state(&ctx, tag, StateArgs::default()).await;
                match switched {
                    // Unregistered: registration gets the command event too.
                    Ok(SwitchOutcome::Adopted(StateTag::Registration))
                        if tag != StateTag::Registration =>
                    {
                        machine.handle(&ctx, &event).await
                    }
                    Ok(_) => Ok(()),
                    Err(e) => Err(e),
                }
            }
        };
        if command.is_some() {
            session.messenger.remove_temp_messages().await;
        }

        if let Err(e) = result {
            error!("chat {chat_id}: conversation broken in {}: {e}; restarting", machine.state());
            if let Err(e) = machine.reset(StateTag::Init) {
                error!("chat {chat_id}: reset failed: {e}");
            }
        }

        if let IncomingEvent::Action(action) = &event {
            if !ctx.was_answered() {
                ctx.answer(action, None).await;
            }
        }
    }
}
