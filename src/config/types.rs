use crate::links::LinkConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_irc_server() -> String {
    "irc.libera.chat".into()
}

fn default_irc_port() -> u16 {
    6697
}

fn default_nickname() -> String {
    "laura".into()
}

fn default_realname() -> String {
    "Laura".into()
}

fn default_irc_channels() -> Vec<String> {
    vec!["#laura".into()]
}

fn default_true() -> bool {
    true
}

fn default_webhook_host() -> String {
    "0.0.0.0".into()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

/// Top-level configuration, read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where this config was read from, if anywhere.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub links: LinkConfig,

    #[serde(default)]
    pub irc: IrcConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrcConfig {
    /// IRC server hostname
    #[serde(default = "default_irc_server")]
    pub server: String,
    /// IRC server port (default: 6697 for TLS)
    #[serde(default = "default_irc_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub tls: bool,
    /// Bot nickname; a random suffix is appended when it is taken
    #[serde(default = "default_nickname")]
    pub nickname: String,
    /// Username (defaults to nickname if not set)
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Channels to join on connect
    #[serde(default = "default_irc_channels")]
    pub channels: Vec<String>,
    /// Server password (for bouncers like ZNC)
    #[serde(default)]
    pub server_password: Option<String>,
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            server: default_irc_server(),
            port: default_irc_port(),
            tls: true,
            nickname: default_nickname(),
            username: None,
            realname: default_realname(),
            channels: default_irc_channels(),
            server_password: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token. Usually supplied through `LAURA_ACCESS_TOKEN`.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Long-poll duration passed to `getUpdates`.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    /// Receive updates over a webhook instead of long polling.
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            poll_timeout_secs: default_poll_timeout_secs(),
            webhook: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Address the webhook server binds to
    #[serde(default = "default_webhook_host")]
    pub host: String,
    pub port: u16,
    /// Public HTTPS URL registered with `setWebhook`. When unset the webhook
    /// is assumed to be registered already.
    #[serde(default)]
    pub url: Option<String>,
    /// Sent to Telegram and expected back in `X-Telegram-Bot-Api-Secret-Token`
    #[serde(default)]
    pub secret_token: Option<String>,
}

impl WebhookConfig {
    pub fn new(port: u16) -> Self {
        Self {
            host: default_webhook_host(),
            port,
            url: None,
            secret_token: None,
        }
    }
}
