use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::{Tz, TZ_VARIANTS};
use habitual_core::{
    error::BotError,
    message::{Keyboard, PlainText, StructuredAction},
    model::UserUpdate,
    time::{format_hhmm, offset_label},
};
use tracing::{info, warn};

use super::back_button;
use crate::i18n::{self, t};
use crate::machine::{ConversationState, StateContext, StateTag, Transition};

/// More matches than this are not offered as buttons.
pub const MAX_TIMEZONE_CHOICES: usize = 10;

/// IANA zones whose name contains `query`, ignoring case and treating spaces
/// as underscores. An exact name match wins outright.
pub fn search_timezones(query: &str) -> Vec<Tz> {
    let needle = query.trim().to_lowercase().replace(' ', "_");
    if needle.is_empty() {
        return Vec::new();
    }
    if let Some(exact) = TZ_VARIANTS
        .iter()
        .find(|tz| tz.name().to_lowercase() == needle)
    {
        return vec![*exact];
    }
    TZ_VARIANTS
        .iter()
        .filter(|tz| tz.name().to_lowercase().contains(&needle))
        .copied()
        .collect()
}

/// Free-text timezone search with confirmation.
pub struct ChooseTimezoneState {
    selected: Option<Tz>,
}

impl ChooseTimezoneState {
    pub fn new() -> Self {
        Self { selected: None }
    }

    /// Current zone, local time and offset, then the hint or the search prompt.
    fn render_prompt(ctx: &StateContext, hint: Option<&str>, keyboard: Option<Keyboard>) {
        let profile = ctx.profile();
        let lang = profile.language.as_str();
        let tz = profile.tz();
        let now = Utc::now();
        let mut text = i18n::timezone_current(
            lang,
            tz.name(),
            &format_hhmm(now.with_timezone(&tz).time()),
            &offset_label(tz, now),
        );
        text.push_str("\n\n");
        text.push_str(hint.unwrap_or(t("timezone_prompt", lang)));
        ctx.messenger().update_main_message(text, keyboard);
    }

    fn render_selected(&self, ctx: &StateContext, tz: Tz) {
        let lang = ctx.lang();
        let now = Utc::now();
        let text = i18n::timezone_selected(
            &lang,
            tz.name(),
            &format_hhmm(now.with_timezone(&tz).time()),
            &offset_label(tz, now),
        );
        let keyboard = Keyboard::new()
            .button(t("btn_confirm", &lang), "tz:ok")
            .row(vec![back_button(&lang, "tz:back")]);
        ctx.messenger().update_main_message(text, Some(keyboard));
    }

    async fn confirm(&self, ctx: &StateContext, tz: Tz) {
        ctx.session
            .update_profile(|p| p.timezone = tz.name().to_string());
        info!("chat {}: timezone set to {}", ctx.session.chat_id, tz.name());

        let Some(id) = ctx.profile().backend_id else {
            return;
        };
        let update = UserUpdate {
            id,
            timezone: Some(tz.name().to_string()),
            ..Default::default()
        };
        if let Err(e) = ctx.backend().update_user(&update).await {
            warn!("chat {}: failed to store timezone: {e}", ctx.session.chat_id);
        }
    }
}

impl Default for ChooseTimezoneState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationState for ChooseTimezoneState {
    fn tag(&self) -> StateTag {
        StateTag::ChooseTimezone
    }

    async fn on_enter(&mut self, ctx: &StateContext) -> Result<(), BotError> {
        Self::render_prompt(ctx, None, None);
        Ok(())
    }

    async fn handle_text(
        &mut self,
        ctx: &StateContext,
        msg: &PlainText,
    ) -> Result<Transition, BotError> {
        let lang = ctx.lang();
        let matches = search_timezones(&msg.text);
        self.selected = None;
        match matches.len() {
            0 => Self::render_prompt(ctx, Some(t("timezone_no_matches", &lang)), None),
            1 => {
                self.selected = Some(matches[0]);
                self.render_selected(ctx, matches[0]);
            }
            n if n <= MAX_TIMEZONE_CHOICES => {
                let mut keyboard = Keyboard::new();
                for tz in &matches {
                    keyboard = keyboard.button(tz.name(), format!("tz:set:{}", tz.name()));
                }
                Self::render_prompt(ctx, Some(t("timezone_pick", &lang)), Some(keyboard));
            }
            _ => Self::render_prompt(ctx, Some(t("timezone_too_many", &lang)), None),
        }
        Ok(Transition::Stay)
    }

    async fn handle_action(
        &mut self,
        ctx: &StateContext,
        action: &StructuredAction,
    ) -> Result<Transition, BotError> {
        let data = action.data.as_str();
        if data == "tz:back" {
            return Ok(Transition::end());
        }
        if data == "tz:ok" {
            if let Some(tz) = self.selected {
                self.confirm(ctx, tz).await;
                let lang = ctx.lang();
                ctx.answer(action, Some(t("timezone_saved", &lang))).await;
                return Ok(Transition::end());
            }
        }
        if let Some(name) = data.strip_prefix("tz:set:") {
            if let Ok(tz) = name.parse::<Tz>() {
                self.selected = Some(tz);
                self.render_selected(ctx, tz);
                return Ok(Transition::Stay);
            }
        }
        // Stale button.
        Self::render_prompt(ctx, None, None);
        Ok(Transition::Stay)
    }
}
