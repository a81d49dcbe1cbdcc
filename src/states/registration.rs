use async_trait::async_trait;
use habitual_core::{
    error::BotError,
    message::{PlainText, StructuredAction},
};
use tracing::{info, warn};

use crate::i18n::{self, t};
use crate::machine::{Capabilities, ConversationState, StateContext, StateTag, Transition};

/// Onboarding steps, walked once per registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Register,
    Language,
    Timezone,
}

/// Creates the habit service user, then walks language and timezone setup.
///
/// Immediate-handle: the event that adopted it, and the event that ended each
/// setup step, are fed straight back in so the flow moves without waiting
/// for more input. Non-switchable: commands cannot interrupt onboarding.
pub struct RegistrationState {
    step: Step,
}

impl RegistrationState {
    pub fn new() -> Self {
        Self {
            step: Step::Register,
        }
    }

    async fn advance(
        &mut self,
        ctx: &StateContext,
        sender: Option<&str>,
    ) -> Result<Transition, BotError> {
        match self.step {
            Step::Register => {
                let profile = ctx.profile();
                if profile.backend_id.is_none() {
                    let name = sender
                        .map(str::to_string)
                        .or(profile.username)
                        .unwrap_or_else(|| format!("user{}", ctx.session.chat_id));
                    let user = ctx
                        .backend()
                        .register_user(
                            ctx.session.chat_id,
                            &name,
                            &profile.language,
                            &profile.timezone,
                        )
                        .await?;
                    info!("chat {}: registered as user {}", ctx.session.chat_id, user.id);
                    ctx.session.update_profile(|p| {
                        p.backend_id = Some(user.id);
                        p.username = Some(user.name);
                    });
                }
                self.step = Step::Language;
                Ok(Transition::to(StateTag::ChooseLanguage))
            }
            Step::Language => {
                self.step = Step::Timezone;
                Ok(Transition::to(StateTag::ChooseTimezone))
            }
            Step::Timezone => Ok(Transition::end()),
        }
    }
}

impl Default for RegistrationState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationState for RegistrationState {
    fn tag(&self) -> StateTag {
        StateTag::Registration
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            suspendable: true,
            non_switchable: true,
            immediate_handle: true,
        }
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        let lang = ctx.lang();
        ctx.messenger().update_main_message(
            format!("{}\n\n{}", t("welcome", &lang), t("send_any_text", &lang)),
            None,
        );
        Ok(())
    }

    /// Publish the command menu and show what the bot can do.
    async fn on_exit(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        let lang = ctx.lang();
        ctx.messenger().update_main_message(
            format!("{}\n\n{}", t("registration_done", &lang), t("help_text", &lang)),
            None,
        );
        let menu = i18n::command_menu(&lang);
        if let Err(e) = ctx
            .services
            .channel
            .set_commands(ctx.session.chat_id, &menu)
            .await
        {
            warn!("chat {}: failed to publish commands: {e}", ctx.session.chat_id);
        }
        Ok(())
    }

    async fn handle_text(
        &mut self,
        ctx: &StateContext,
        msg: &PlainText,
    ) -> Result<Transition, BotError> {
        self.advance(ctx, msg.sender_name.as_deref()).await
    }

    async fn handle_action(
        &mut self,
        ctx: &StateContext,
        action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        self.advance(ctx, action.sender_name.as_deref()).await
    }
}
