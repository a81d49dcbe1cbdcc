mod defaults;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::BotError;
use defaults::*;

/// Top-level Habitual configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub messenger: MessengerConfig,
    #[serde(default)]
    pub notificator: NotificatorConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// Telegram bot config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    /// Chat ids allowed to talk to the bot. Empty = allow all.
    #[serde(default)]
    pub allowed_users: Vec<i64>,
}

impl TelegramConfig {
    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_users.is_empty() || self.allowed_users.contains(&chat_id)
    }
}

/// Habit service connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Outbound rate shaping: how many sessions are drained per period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessengerConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            period_ms: default_period_ms(),
        }
    }
}

/// Reminder polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificatorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_notificator_period")]
    pub period_secs: u64,
    /// Extra seconds looked back on every poll; must stay below `period_secs`.
    #[serde(default = "default_notificator_overlap")]
    pub overlap_secs: u64,
}

impl Default for NotificatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period_secs: default_notificator_period(),
            overlap_secs: default_notificator_overlap(),
        }
    }
}

/// Habit wizard input limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
    #[serde(default = "default_max_notifications")]
    pub max_notifications: usize,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            max_name_len: default_max_name_len(),
            max_description_len: default_max_description_len(),
            max_notifications: default_max_notifications(),
        }
    }
}

impl Config {
    /// Reject combinations the runtime cannot honour.
    pub fn validate(&self) -> Result<(), BotError> {
        let n = &self.notificator;
        if n.period_secs == 0 {
            return Err(BotError::Config(
                "notificator.period_secs must be positive".into(),
            ));
        }
        if n.overlap_secs >= n.period_secs {
            return Err(BotError::Config(format!(
                "notificator.overlap_secs ({}) must be less than period_secs ({})",
                n.overlap_secs, n.period_secs
            )));
        }
        if self.messenger.batch_size == 0 {
            return Err(BotError::Config("messenger.batch_size must be positive".into()));
        }
        Ok(())
    }

    /// Apply `TELEGRAM_BOT_TOKEN` and `BACKEND_URL` from the environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            std::env::var("BACKEND_URL").ok(),
        );
    }

    fn apply_overrides(&mut self, token: Option<String>, backend_url: Option<String>) {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.telegram.bot_token = token;
        }
        if let Some(url) = backend_url.filter(|u| !u.is_empty()) {
            self.backend.base_url = url;
        }
    }
}

/// Parse configuration from TOML text and validate it.
pub fn parse(content: &str) -> Result<Config, BotError> {
    let config: Config = toml::from_str(content)
        .map_err(|e| BotError::Config(format!("failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file, then apply environment overrides.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, BotError> {
    let path = Path::new(path);
    let mut config = if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    } else {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BotError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        parse(&content)?
    };
    config.apply_env();
    Ok(config)
}
