use crate::config::{IrcConfig, TelegramConfig, WebhookConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// `Laura` - posts the title of linked web pages back to the chat.
#[derive(Parser, Debug)]
#[command(name = "laura")]
#[command(author = "killruana")]
#[command(version)]
#[command(about = "An IRC and Telegram bot that answers links with their page title.", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: <config dir>/laura/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the IRC bot
    #[cfg(feature = "irc")]
    Irc(IrcArgs),

    /// Run the Telegram bot (token from LAURA_ACCESS_TOKEN)
    #[cfg(feature = "telegram")]
    Telegram(TelegramArgs),
}

#[derive(Args, Debug, Default)]
pub struct IrcArgs {
    /// IRC server host [default: irc.libera.chat]
    #[arg(long)]
    pub server: Option<String>,

    /// IRC server port [default: 6697]
    #[arg(long)]
    pub port: Option<u16>,

    /// Connect without TLS
    #[arg(long)]
    pub no_tls: bool,

    /// Bot nickname [default: laura]
    #[arg(long)]
    pub nickname: Option<String>,

    /// Channel to join; repeat for several [default: #laura]
    #[arg(long = "channel", value_name = "CHANNEL")]
    pub channels: Vec<String>,

    /// Check that the server is reachable, then exit
    #[arg(long)]
    pub check: bool,
}

impl IrcArgs {
    /// Flags given on the command line win over the config file.
    pub fn apply(&self, config: &mut IrcConfig) {
        if let Some(server) = &self.server {
            config.server.clone_from(server);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.no_tls {
            config.tls = false;
        }
        if let Some(nickname) = &self.nickname {
            config.nickname.clone_from(nickname);
        }
        if !self.channels.is_empty() {
            config.channels.clone_from(&self.channels);
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct TelegramArgs {
    /// Serve a webhook on this port instead of long polling
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address the webhook server binds to [default: 0.0.0.0]
    #[arg(long, value_name = "HOST")]
    pub webhook_host: Option<String>,

    /// Public HTTPS URL to register with Telegram
    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Check that the Bot API accepts the token, then exit
    #[arg(long)]
    pub check: bool,
}

impl TelegramArgs {
    pub fn apply(&self, config: &mut TelegramConfig) {
        if let Some(port) = self.port {
            config
                .webhook
                .get_or_insert_with(|| WebhookConfig::new(port))
                .port = port;
        }

        let Some(webhook) = config.webhook.as_mut() else {
            if self.webhook_host.is_some() || self.webhook_url.is_some() {
                tracing::warn!("webhook host/url ignored without --port; using long polling");
            }
            return;
        };
        if let Some(host) = &self.webhook_host {
            webhook.host.clone_from(host);
        }
        if let Some(url) = &self.webhook_url {
            webhook.url = Some(url.clone());
        }
    }
}
