//! Per-session conversation state machine.
//!
//! One state is current; displaced states with the `suspendable` capability
//! are parked on a stack and resumed when a later state ends.

mod registry;
mod state;


pub use registry::StateRegistry;
pub use state::{
    Capabilities, ConversationState, Services, StateArgs, StateContext, StateTag, Transition,
};

use std::sync::Arc;

use habitual_core::{error::BotError, message::IncomingEvent};
use tracing::{debug, error, info, warn};

use crate::i18n::t;

/// Created when an `end` finds nothing to resume.
pub const FALLBACK_STATE: StateTag = StateTag::WaitCommand;

/// Upper bound on consecutive re-dispatches of one event to
/// immediate-handle states.
pub const MAX_IMMEDIATE_HOPS: usize = 8;

/// Result of an external switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The requested state was already current.
    Unchanged,
    /// A non-switchable state refused the switch.
    Vetoed,
    /// The given state is now current. It may differ from the requested one.
    Adopted(StateTag),
}

pub struct StateMachine {
    registry: Arc<StateRegistry>,
    current: Box<dyn ConversationState>,
    suspended: Vec<Box<dyn ConversationState>>,
}

impl StateMachine {
    /// Start in `initial` without running its `on_enter` hook.
    pub fn new(registry: Arc<StateRegistry>, initial: StateTag) -> Result<Self, BotError> {
        let current = registry.create(initial, StateArgs::default())?;
        Ok(Self {
            registry,
            current,
            suspended: Vec::new(),
        })
    }

    /// Tag of the current state.
    pub fn state(&self) -> StateTag {
        self.current.tag()
    }

    /// Tags on the suspension stack, bottom first.
    pub fn suspended(&self) -> Vec<StateTag> {
        self.suspended.iter().map(|s| s.tag()).collect()
    }

    /// Drop every state and start over in `initial`. No hooks run.
    pub fn reset(&mut self, initial: StateTag) -> Result<(), BotError> {
        self.current = self.registry.create(initial, StateArgs::default())?;
        self.suspended.clear();
        Ok(())
    }

    /// Feed one event to the current state and apply the transition it asks for.
    ///
    /// Handler failures are logged and treated as "stay". Only invariant
    /// breaks (unknown state, duplicate suspension, hop limit) are returned.
    pub async fn handle(&mut self, ctx: &StateContext, event: &IncomingEvent) -> Result<(), BotError> {
        let mut hops = 0;
        loop {
            let result = match event {
                IncomingEvent::Text(msg) => self.current.handle_text(ctx, msg).await,
                IncomingEvent::Action(action) => self.current.handle_action(ctx, action).await,
            };

            let (tag, args) = match result {
                Ok(Transition::Stay) => return Ok(()),
                Ok(Transition::To(tag, args)) => (tag, args),
                Err(e) => {
                    self.report_handler_error(ctx, e);
                    return Ok(());
                }
            };

            if tag == StateTag::End {
                self.finish_current(ctx).await?;
            } else {
                self.advance(ctx, tag, args).await?;
            }

            if !self.current.capabilities().immediate_handle {
                return Ok(());
            }
            hops += 1;
            if hops > MAX_IMMEDIATE_HOPS {
                return Err(BotError::HopLimitExceeded(self.state().to_string()));
            }
            debug!("state {}: immediate re-dispatch", self.state());
        }
    }

    /// Switch to `tag` on behalf of something outside the current state.
    pub async fn set_state(
        &mut self,
        ctx: &StateContext,
        tag: StateTag,
        args: StateArgs,
    ) -> Result<SwitchOutcome, BotError> {
        if tag == self.state() {
            return Ok(SwitchOutcome::Unchanged);
        }

        let veto = std::iter::once(&self.current)
            .chain(self.suspended.iter())
            .find(|s| s.capabilities().non_switchable)
            .map(|s| s.tag());
        if let Some(blocker) = veto {
            warn!(
                "chat {}: switch to {tag} vetoed by {blocker}",
                ctx.session.chat_id
            );
            return Ok(SwitchOutcome::Vetoed);
        }

        let target = if ctx.profile().backend_id.is_none() {
            if tag != StateTag::Registration {
                info!(
                    "chat {}: not registered, redirecting {tag} to registration",
                    ctx.session.chat_id
                );
            }
            StateTag::Registration
        } else {
            tag
        };
        if target == self.state() {
            return Ok(SwitchOutcome::Unchanged);
        }

        let resolved = self.create_or_restore(ctx, target, args).await?;
        let previous = std::mem::replace(&mut self.current, resolved);
        self.exit_or_suspend(ctx, previous).await?;
        Ok(SwitchOutcome::Adopted(target))
    }

    /// The current state emitted `end`: resume the top of the stack or fall back.
    async fn finish_current(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        let resolved = match self.suspended.pop() {
            Some(mut restored) => {
                log_hook(restored.tag(), "on_restore", restored.on_restore(ctx).await);
                restored
            }
            None => {
                let mut fallback = self.registry.create(FALLBACK_STATE, StateArgs::default())?;
                log_hook(fallback.tag(), "on_enter", fallback.on_enter(ctx).await);
                fallback
            }
        };
        let mut ended = std::mem::replace(&mut self.current, resolved);
        log_hook(ended.tag(), "on_exit", ended.on_exit(ctx).await);
        debug!("state {} ended, now {}", ended.tag(), self.state());
        Ok(())
    }

    /// Ordinary transition requested by the current state.
    async fn advance(
        &mut self,
        ctx: &StateContext,
        tag: StateTag,
        args: StateArgs,
    ) -> Result<(), BotError> {
        let mut next = self.registry.create(tag, args)?;
        log_hook(next.tag(), "on_enter", next.on_enter(ctx).await);
        let previous = std::mem::replace(&mut self.current, next);
        debug!("state {} -> {}", previous.tag(), tag);
        self.exit_or_suspend(ctx, previous).await
    }

    async fn create_or_restore(
        &mut self,
        ctx: &StateContext,
        tag: StateTag,
        args: StateArgs,
    ) -> Result<Box<dyn ConversationState>, BotError> {
        let suspended_at = self.suspended.iter().position(|s| s.tag() == tag);
        if let Some(pos) = suspended_at {
            let mut restored = self.suspended.remove(pos);
            log_hook(tag, "on_restore", restored.on_restore(ctx).await);
            return Ok(restored);
        }
        let mut fresh = self.registry.create(tag, args)?;
        log_hook(tag, "on_enter", fresh.on_enter(ctx).await);
        Ok(fresh)
    }

    async fn exit_or_suspend(
        &mut self,
        ctx: &StateContext,
        mut state: Box<dyn ConversationState>,
    ) -> Result<(), BotError> {
        let tag = state.tag();
        if state.capabilities().suspendable {
            if self.suspended.iter().any(|s| s.tag() == tag) {
                return Err(BotError::DuplicateSuspension(tag.to_string()));
            }
            log_hook(tag, "on_suspend", state.on_suspend(ctx).await);
            self.suspended.push(state);
        } else {
            log_hook(tag, "on_exit", state.on_exit(ctx).await);
        }
        Ok(())
    }

    fn report_handler_error(&self, ctx: &StateContext, e: BotError) {
        match e {
            BotError::CollaboratorUnavailable(ref reason) => {
                error!("state {}: habit service unavailable: {reason}", self.state());
                ctx.messenger()
                    .update_main_message(t("service_unavailable", &ctx.lang()), None);
            }
            other => error!("state {}: handler failed: {other}", self.state()),
        }
    }
}

fn log_hook(tag: StateTag, hook: &str, result: Result<(), BotError>) {
    if let Err(e) = result {
        error!("state {tag}: {hook} failed: {e}");
    }
}
