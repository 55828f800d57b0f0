mod handler;
mod update;
mod webhook;

use crate::config::WebhookConfig;
use anyhow::Context;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;


const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// How updates reach the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelegramMode {
    /// `getUpdates` long polling
    Polling,
    /// Telegram POSTs updates to our HTTP server
    Webhook(WebhookConfig),
}

/// Telegram channel: long-polls the Bot API or serves a webhook
pub struct TelegramChannel {
    bot_token: String,
    api_base: String,
    mode: TelegramMode,
    poll_timeout_secs: u64,
    client: reqwest::Client,
    bot_username: OnceLock<String>,
}

impl TelegramChannel {
    pub fn new(bot_token: String, mode: TelegramMode) -> Self {
        Self {
            bot_token,
            api_base: TELEGRAM_API_BASE.to_string(),
            mode,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            client: reqwest::Client::new(),
            bot_username: OnceLock::new(),
        }
    }

    /// Point API calls somewhere other than `api.telegram.org`.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }

    pub fn mode(&self) -> &TelegramMode {
        &self.mode
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }

    /// Long polls hold the request open for `poll_timeout_secs`.
    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs + 15)
    }

    /// Call a Bot API method and return its `result`.
    async fn call(&self, method: &str, body: &Value) -> anyhow::Result<Value> {
        let resp = self
            .client
            .post(self.api_url(method))
            .timeout(self.request_timeout())
            .json(body)
            .send()
            .await
            .with_context(|| format!("Telegram {method} request"))?;

        let status = resp.status();
        if !status.is_success() {
            let err = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            anyhow::bail!("Telegram {method} failed ({status}): {err}");
        }

        let mut data: Value = resp
            .json()
            .await
            .with_context(|| format!("decode Telegram {method} response"))?;
        if data.get("ok").and_then(Value::as_bool) != Some(true) {
            anyhow::bail!(
                "Telegram {method} rejected: {}",
                data.get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("no description")
            );
        }

        Ok(data.get_mut("result").map(Value::take).unwrap_or_default())
    }

    /// Fetch the bot's own username once, for `/cmd@bot` matching.
    async fn learn_bot_username(&self) {
        if self.bot_username.get().is_some() {
            return;
        }
        match self.call("getMe", &serde_json::json!({})).await {
            Ok(me) => {
                if let Some(username) = me.get("username").and_then(Value::as_str) {
                    tracing::info!("Telegram bot is @{username}");
                    let _ = self.bot_username.set(username.to_string());
                }
            }
            Err(error) => tracing::warn!(%error, "Telegram getMe failed"),
        }
    }
}
