use crate::channels::{Channel, ChannelRuntime, doctor_channels, start_channels};
use crate::cli::Commands;
use crate::cli::commands::Cli;
use crate::config::{Config, TelegramConfig};
use crate::error::{ConfigError, Result};
use crate::links::TitleResolver;
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "irc")]
use crate::channels::IrcChannel;
#[cfg(feature = "telegram")]
use crate::channels::{TelegramChannel, TelegramMode};

/// Build the Telegram channel, refusing to start without a token.
#[cfg(feature = "telegram")]
pub fn telegram_channel(config: &TelegramConfig) -> std::result::Result<TelegramChannel, ConfigError> {
    let Some(token) = config.access_token.clone() else {
        tracing::error!("Access token not defined");
        return Err(ConfigError::MissingAccessToken);
    };

    let mode = match &config.webhook {
        Some(webhook) => {
            info!(port = webhook.port, "Starting webhook");
            TelegramMode::Webhook(webhook.clone())
        }
        None => {
            info!("Starting polling");
            TelegramMode::Polling
        }
    };

    Ok(TelegramChannel::new(token, mode).with_poll_timeout(config.poll_timeout_secs))
}

async fn run(config: &Config, channel: Arc<dyn Channel>, check: bool) -> Result<()> {
    let channels = vec![channel];
    if check {
        doctor_channels(&channels).await?;
        return Ok(());
    }

    let resolver = TitleResolver::new(config.links.clone())?;
    start_channels(ChannelRuntime { channels, resolver }).await?;
    Ok(())
}

pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    match cli.command {
        #[cfg(feature = "irc")]
        Commands::Irc(args) => {
            args.apply(&mut config.irc);
            config.validate()?;
            info!(
                server = %config.irc.server,
                nickname = %config.irc.nickname,
                channels = ?config.irc.channels,
                "Creating IRC client"
            );
            let channel = Arc::new(IrcChannel::new(config.irc.clone()));
            run(&config, channel, args.check).await
        }
        #[cfg(feature = "telegram")]
        Commands::Telegram(args) => {
            args.apply(&mut config.telegram);
            config.validate()?;
            let channel = Arc::new(telegram_channel(&config.telegram)?);
            run(&config, channel, args.check).await
        }
    }
}
