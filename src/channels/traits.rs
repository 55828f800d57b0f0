use std::future::Future;
use std::pin::Pin;

/// A message received from a channel.
///
/// `reply_target` is where an answer goes (IRC channel name, Telegram chat
/// id). `sender` is the human-readable author (IRC nick, Telegram first name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    pub id: String,
    pub channel: String,
    pub reply_target: String,
    pub sender: String,
    pub content: String,
    pub timestamp: u64,
}

/// A chat transport the bot listens on and replies through
pub trait Channel: Send + Sync {
    /// Human-readable channel name
    fn name(&self) -> &str;

    /// Send a message through this channel
    fn send<'a>(
        &'a self,
        message: &'a str,
        recipient: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

    /// Start listening for incoming messages (long-running)
    fn listen<'a>(
        &'a self,
        tx: tokio::sync::mpsc::Sender<ChannelMessage>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

    /// Check if channel is healthy
    fn health_check<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move { true })
    }

    fn max_message_length(&self) -> usize {
        usize::MAX
    }

    /// Whether `/commands` are answered on this channel.
    fn commands_enabled(&self) -> bool {
        false
    }

    /// Bot account name used to match `/cmd@name` mentions, once known.
    fn bot_username(&self) -> Option<String> {
        None
    }
}

pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
