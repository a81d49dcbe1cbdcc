use async_trait::async_trait;
use habitual_core::{
    error::BotError,
    message::{Button, Keyboard, PlainText, StructuredAction},
    model::UserUpdate,
};
use tracing::{info, warn};

use crate::i18n::{self, t, LANGUAGES};
use crate::machine::{ConversationState, StateContext, StateTag, Transition};

pub struct ChooseLanguageState;

impl ChooseLanguageState {
    fn render(ctx: &StateContext) {
        let keyboard = Keyboard::new().row(
            LANGUAGES
                .iter()
                .map(|(code, name)| Button::new(*name, format!("lang:{code}")))
                .collect(),
        );
        ctx.messenger()
            .update_main_message(t("choose_language", &ctx.lang()), Some(keyboard));
    }

    /// Store the language locally and on the habit service. A failed remote
    /// update is logged; the session keeps the new language regardless.
    async fn apply(ctx: &StateContext, code: &str) {
        ctx.session.update_profile(|p| p.language = code.to_string());
        info!("chat {}: language set to {code}", ctx.session.chat_id);

        let Some(id) = ctx.profile().backend_id else {
            return;
        };
        let update = UserUpdate {
            id,
            language: Some(code.to_string()),
            ..Default::default()
        };
        if let Err(e) = ctx.backend().update_user(&update).await {
            warn!("chat {}: failed to store language: {e}", ctx.session.chat_id);
        }
        let menu = i18n::command_menu(code);
        if let Err(e) = ctx
            .services
            .channel
            .set_commands(ctx.session.chat_id, &menu)
            .await
        {
            warn!("chat {}: failed to publish commands: {e}", ctx.session.chat_id);
        }
    }
}

#[async_trait]
impl ConversationState for ChooseLanguageState {
    fn tag(&self) -> StateTag {
        StateTag::ChooseLanguage
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        Self::render(ctx);
        Ok(())
    }

    async fn handle_text(
        &mut self,
        ctx: &StateContext,
        _msg: &PlainText,
    ) -> Result<Transition, BotError> {
        Self::render(ctx);
        Ok(Transition::Stay)
    }

    async fn handle_action(
        &mut self,
        ctx: &StateContext,
        action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        match action.data.strip_prefix("lang:") {
            Some(code) if i18n::is_supported(code) => {
                Self::apply(ctx, code).await;
                ctx.answer(action, Some(t("language_saved", code))).await;
                Ok(Transition::end())
            }
            _ => {
                Self::render(ctx);
                Ok(Transition::Stay)
            }
        }
    }
}
