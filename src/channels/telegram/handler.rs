use super::update::{parse_update, update_id};
use super::{TelegramChannel, TelegramMode, webhook};
use crate::channels::traits::{Channel, ChannelMessage};
use crate::error::TransportError;
use serde_json::{Value, json};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;

const TELEGRAM_MAX_MESSAGE_CHARS: usize = 4096;
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

impl TelegramChannel {
    async fn poll_updates(&self, tx: mpsc::Sender<ChannelMessage>) -> anyhow::Result<()> {
        // getUpdates is refused while a webhook is registered.
        self.call("deleteWebhook", &json!({})).await?;

        let mut offset: i64 = 0;
        tracing::info!("Telegram channel listening for messages...");

        loop {
            let body = json!({
                "offset": offset,
                "timeout": self.poll_timeout_secs,
                "allowed_updates": ["message"]
            });

            let updates = match self.call("getUpdates", &body).await {
                Ok(result) => result,
                Err(error) => {
                    tracing::warn!(%error, "Telegram poll error");
                    if tx.is_closed() {
                        return Ok(());
                    }
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            let Some(updates) = updates.as_array() else {
                continue;
            };

            for update in updates {
                // Advance offset past this update
                if let Some(uid) = update_id(update) {
                    offset = uid + 1;
                }

                let Some(msg) = parse_update(update) else {
                    continue;
                };

                if tx.send(msg).await.is_err() {
                    return Ok(());
                }
            }
        }
    }
}

fn split_chars(message: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = message.chars().collect();
    chars
        .chunks(max_chars.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn max_message_length(&self) -> usize {
        TELEGRAM_MAX_MESSAGE_CHARS
    }

    fn commands_enabled(&self) -> bool {
        true
    }

    fn bot_username(&self) -> Option<String> {
        self.bot_username.get().cloned()
    }

    fn send<'a>(
        &'a self,
        message: &'a str,
        chat_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            for chunk in split_chars(message, self.max_message_length()) {
                let body = json!({
                    "chat_id": chat_id,
                    "text": chunk,
                });
                self.call("sendMessage", &body).await.map_err(|e| {
                    TransportError::Send {
                        channel: "telegram".into(),
                        message: format!("{e:#}"),
                    }
                })?;
            }
            Ok(())
        })
    }

    fn listen<'a>(
        &'a self,
        tx: mpsc::Sender<ChannelMessage>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.learn_bot_username().await;
            match &self.mode {
                TelegramMode::Polling => self.poll_updates(tx).await,
                TelegramMode::Webhook(config) => webhook::run_webhook(self, config, tx).await,
            }
        })
    }

    fn health_check<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            match self.call("getMe", &Value::Object(serde_json::Map::new())).await {
                Ok(_) => true,
                Err(error) => {
                    tracing::debug!(%error, "Telegram health check failed");
                    false
                }
            }
        })
    }
}
