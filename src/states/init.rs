use async_trait::async_trait;
use habitual_core::{
    error::BotError,
    message::{PlainText, StructuredAction},
};

use crate::machine::{ConversationState, StateContext, StateTag, Transition};

/// Every session starts here. The first event routes it onward.
pub struct InitState;

impl InitState {
    fn route(ctx: &StateContext) -> Transition {
        if ctx.profile().backend_id.is_some() {
            Transition::to(StateTag::Help)
        } else {
            Transition::to(StateTag::Registration)
        }
    }
}

#[async_trait]
impl ConversationState for InitState {
    fn tag(&self) -> StateTag {
        StateTag::Init
    }

    async fn handle_text(
        &mut self,
        ctx: &StateContext,
        _msg: &PlainText,
    ) -> Result<Transition, BotError> {
        Ok(Self::route(ctx))
    }

    async fn handle_action(
        &mut self,
        ctx: &StateContext,
        _action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        Ok(Self::route(ctx))
    }
}
