mod gateway;
mod i18n;
mod machine;
mod messenger;
mod messenger_queue;
mod notificator;
mod session;
mod states;
mod wizard;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use habitual_backend::http::HttpBackend;
use habitual_channels::telegram::TelegramChannel;
use habitual_core::{
    config,
    traits::{BackendRepository, Channel},
};

#[derive(Parser)]
#[command(
    name = "habitual",
    version,
    about = "Habitual: habit tracking chat bot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, global = true, env = "HABITUAL_CONFIG", default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Show the effective configuration and check the habit service.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    cfg.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.bot.log_level)),
        )
        .init();

    match cli.command {
        Commands::Start => {
            if !cfg.telegram.enabled {
                anyhow::bail!("Telegram is disabled. Enable it in config.toml.");
            }
            if cfg.telegram.bot_token.is_empty() {
                anyhow::bail!(
                    "Telegram is enabled but bot_token is empty. \
                     Set it in config.toml or TELEGRAM_BOT_TOKEN env var."
                );
            }

            let backend: Arc<dyn BackendRepository> = Arc::new(HttpBackend::new(&cfg.backend)?);
            if !backend.health().await {
                tracing::warn!(
                    "habit service at {} is not responding; starting anyway",
                    cfg.backend.base_url
                );
            }
            let channel: Arc<dyn Channel> = Arc::new(TelegramChannel::new(cfg.telegram.clone()));

            println!("{} — starting...", cfg.bot.name);
            let gw = Arc::new(gateway::Gateway::new(&cfg, channel, backend));
            gw.run().await?;
        }
        Commands::Status => {
            println!("{} — status\n", cfg.bot.name);
            println!("Config: {}", cli.config);
            println!(
                "  telegram: {}",
                if cfg.telegram.enabled && !cfg.telegram.bot_token.is_empty() {
                    "configured"
                } else if cfg.telegram.enabled {
                    "enabled but missing bot_token"
                } else {
                    "disabled"
                }
            );
            println!(
                "  allowed users: {}",
                if cfg.telegram.allowed_users.is_empty() {
                    "everyone".to_string()
                } else {
                    cfg.telegram.allowed_users.len().to_string()
                }
            );
            println!(
                "  reminders: {} (every {}s, {}s overlap)",
                if cfg.notificator.enabled { "on" } else { "off" },
                cfg.notificator.period_secs,
                cfg.notificator.overlap_secs
            );

            let backend = HttpBackend::new(&cfg.backend)?;
            println!(
                "  habit service ({}): {}",
                cfg.backend.base_url,
                if backend.health().await {
                    "reachable"
                } else {
                    "unreachable"
                }
            );
        }
    }

    Ok(())
}
