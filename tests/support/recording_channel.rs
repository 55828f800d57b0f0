use laura::channels::{Channel, ChannelMessage};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

/// In-memory channel that records everything sent through it.
pub struct RecordingChannel {
    name: &'static str,
    commands: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingChannel {
    pub fn new(name: &'static str, commands: bool) -> Self {
        Self {
            name,
            commands,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// `(recipient, message)` pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn message(&self, reply_target: &str, sender: &str, content: &str) -> ChannelMessage {
        ChannelMessage {
            id: format!("{}_test", self.name),
            channel: self.name.to_string(),
            reply_target: reply_target.to_string(),
            sender: sender.to_string(),
            content: content.to_string(),
            timestamp: 0,
        }
    }
}

impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        self.name
    }

    fn commands_enabled(&self) -> bool {
        self.commands
    }

    fn send<'a>(
        &'a self,
        message: &'a str,
        recipient: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.sent
                .lock()
                .unwrap()
                .push((recipient.to_string(), message.to_string()));
            Ok(())
        })
    }

    fn listen<'a>(
        &'a self,
        _tx: tokio::sync::mpsc::Sender<ChannelMessage>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move { Ok(()) })
    }
}
