use async_trait::async_trait;
use habitual_core::{
    error::BotError,
    message::{Button, Keyboard, StructuredAction},
};

use super::back_button;
use crate::i18n::{t, LANGUAGES};
use crate::machine::{Capabilities, ConversationState, StateContext, StateTag, Transition};

/// Entry point to language and timezone. Stays suspended while either runs.
pub struct SettingsState;

impl SettingsState {
    fn render(ctx: &StateContext) {
        let profile = ctx.profile();
        let lang = profile.language.as_str();
        let language = LANGUAGES
            .iter()
            .find(|(code, _)| *code == lang)
            .map_or(lang, |(_, name)| *name);
        let text = format!(
            "{}\n\n{}: {language}\n{}: {}",
            t("settings_header", lang),
            t("btn_language", lang),
            t("btn_timezone", lang),
            profile.timezone
        );
        let keyboard = Keyboard::new()
            .row(vec![
                Button::new(t("btn_language", lang), "settings:language"),
                Button::new(t("btn_timezone", lang), "settings:timezone"),
            ])
            .row(vec![back_button(lang, "settings:back")]);
        ctx.messenger().update_main_message(text, Some(keyboard));
    }
}

#[async_trait]
impl ConversationState for SettingsState {
    fn tag(&self) -> StateTag {
        StateTag::Settings
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SUSPENDABLE
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        Self::render(ctx);
        Ok(())
    }

    async fn on_restore(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        Self::render(ctx);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        ctx: &StateContext,
        action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        Ok(match action.data.as_str() {
            "settings:language" => Transition::to(StateTag::ChooseLanguage),
            "settings:timezone" => Transition::to(StateTag::ChooseTimezone),
            "settings:back" => Transition::end(),
            _ => {
                Self::render(ctx);
                Transition::Stay
            }
        })
    }
}
