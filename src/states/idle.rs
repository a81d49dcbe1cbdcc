use async_trait::async_trait;
use habitual_core::error::BotError;

use crate::i18n::t;
use crate::machine::{ConversationState, StateContext, StateTag};

/// Idle between commands. Input is ignored.
pub struct WaitCommandState;

#[async_trait]
impl ConversationState for WaitCommandState {
    fn tag(&self) -> StateTag {
        StateTag::WaitCommand
    }
}

pub struct HelpState;

impl HelpState {
    fn render(ctx: &StateContext) {
        ctx.messenger()
            .update_main_message(t("help_text", &ctx.lang()), None);
    }
}

#[async_trait]
impl ConversationState for HelpState {
    fn tag(&self) -> StateTag {
        StateTag::Help
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        Self::render(ctx);
        Ok(())
    }

    async fn on_restore(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        Self::render(ctx);
        Ok(())
    }
}
