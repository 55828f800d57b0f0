use crate::commands::parse_command;
use crate::error::TitleError;
use crate::links::TitleResolver;
use std::sync::Arc;

use super::traits::{Channel, ChannelMessage};

/// Everything the message loop needs: the live channels and the title pipeline.
pub struct ChannelRuntime {
    pub channels: Vec<Arc<dyn Channel>>,
    pub resolver: TitleResolver,
}

/// Longest title, in bytes, that is posted back to a channel.
pub const MAX_TITLE_BYTES: usize = 300;

/// Fold line breaks into single spaces and clip to `max_bytes` at a UTF-8
/// boundary, marking a cut with an ellipsis.
fn outgoing_title(title: &str, max_bytes: usize) -> String {
    let mut out = title
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if out.len() <= max_bytes {
        return out;
    }

    let mut cut = max_bytes.saturating_sub('…'.len_utf8());
    while cut > 0 && !out.is_char_boundary(cut) {
        cut -= 1;
    }
    out.truncate(cut);
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

fn origin_channel<'a>(
    channels: &'a [Arc<dyn Channel>],
    name: &str,
) -> Option<&'a Arc<dyn Channel>> {
    channels.iter().find(|ch| ch.name() == name)
}

async fn reply_to_origin(channel: &dyn Channel, message: &str, recipient: &str) {
    if let Err(error) = channel.send(message, recipient).await {
        tracing::warn!(
            channel = channel.name(),
            recipient,
            %error,
            "channel reply failed"
        );
    }
}

/// Handle one inbound message: answer a command, or post the title of the
/// linked page. Every failure ends silently; nothing is sent on error.
pub async fn handle_channel_message(rt: &ChannelRuntime, msg: &ChannelMessage) {
    let Some(channel) = origin_channel(&rt.channels, &msg.channel) else {
        tracing::warn!(channel = %msg.channel, "message from unknown channel dropped");
        return;
    };

    if channel.commands_enabled()
        && let Some(command) = parse_command(&msg.content, channel.bot_username().as_deref())
    {
        tracing::info!(
            channel = %msg.channel,
            sender = %msg.sender,
            ?command,
            "command received"
        );
        let reply = command.reply(&msg.sender);
        reply_to_origin(channel.as_ref(), &reply, &msg.reply_target).await;
        return;
    }

    match rt.resolver.title_for_message(&msg.content).await {
        Ok(title) => {
            let limit = MAX_TITLE_BYTES.min(channel.max_message_length());
            let title = outgoing_title(&title, limit);
            tracing::info!(
                channel = %msg.channel,
                target = %msg.reply_target,
                %title,
                "posting page title"
            );
            reply_to_origin(channel.as_ref(), &title, &msg.reply_target).await;
        }
        Err(TitleError::NoUrl) => {}
        Err(error) => {
            tracing::debug!(
                channel = %msg.channel,
                sender = %msg.sender,
                %error,
                "no title posted"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::LinkConfig;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct RecordingChannel {
        name: &'static str,
        commands: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingChannel {
        fn new(name: &'static str, commands: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                commands,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Channel for RecordingChannel {
        fn name(&self) -> &str {
            self.name
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
                    .push((message.to_string(), recipient.to_string()));
                Ok(())
            })
        }

        fn listen<'a>(
            &'a self,
            _tx: tokio::sync::mpsc::Sender<ChannelMessage>,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
            Box::pin(async move { Ok(()) })
        }

        fn commands_enabled(&self) -> bool {
            self.commands
        }
    }

    fn runtime(channel: Arc<RecordingChannel>) -> ChannelRuntime {
        ChannelRuntime {
            channels: vec![channel as Arc<dyn Channel>],
            resolver: TitleResolver::new(LinkConfig::default()).unwrap(),
        }
    }

    fn message(channel: &str, content: &str) -> ChannelMessage {
        ChannelMessage {
            id: "1".into(),
            channel: channel.into(),
            reply_target: "#rust".into(),
            sender: "Alice".into(),
            content: content.into(),
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn posts_title_to_reply_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(
                    "<html><head><title>  Hello World  </title></head></html>",
                    "text/html; charset=utf-8",
                ),
            )
            .mount(&server)
            .await;

        let channel = RecordingChannel::new("irc", false);
        let rt = runtime(Arc::clone(&channel));
        let text = format!("look {}/page", server.uri());
        handle_channel_message(&rt, &message("irc", &text)).await;

        assert_eq!(
            channel.sent(),
            vec![("Hello World".to_string(), "#rust".to_string())]
        );
    }

    #[tokio::test]
    async fn huge_title_is_posted_once_and_clipped() {
        let server = MockServer::start().await;
        let page = format!("<title>{}</title>", "word ".repeat(100_000));
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html"))
            .mount(&server)
            .await;

        let channel = RecordingChannel::new("irc", false);
        let rt = runtime(Arc::clone(&channel));
        handle_channel_message(&rt, &message("irc", &server.uri())).await;

        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].0.len() <= MAX_TITLE_BYTES);
        assert!(sent[0].0.starts_with("word word"));
        assert!(sent[0].0.ends_with('…'));
    }

    #[test]
    fn line_breaks_fold_into_spaces() {
        assert_eq!(
            outgoing_title("Part one\r\n\n   part two\rthree", 300),
            "Part one part two three"
        );
    }

    #[test]
    fn clipping_respects_char_boundaries() {
        let clipped = outgoing_title(&"é".repeat(10), 8);
        assert_eq!(clipped, "éé…");
        assert_eq!(outgoing_title("short", 8), "short");
    }

    #[tokio::test]
    async fn silent_without_url() {
        let channel = RecordingChannel::new("irc", false);
        let rt = runtime(Arc::clone(&channel));
        handle_channel_message(&rt, &message("irc", "hello there")).await;
        assert!(channel.sent().is_empty());
    }

    #[tokio::test]
    async fn silent_on_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_raw("<title>Not Found</title>", "text/html"),
            )
            .mount(&server)
            .await;

        let channel = RecordingChannel::new("irc", false);
        let rt = runtime(Arc::clone(&channel));
        handle_channel_message(&rt, &message("irc", &server.uri())).await;
        assert!(channel.sent().is_empty());
    }

    #[tokio::test]
    async fn ping_answered_when_commands_enabled() {
        let channel = RecordingChannel::new("telegram", true);
        let rt = runtime(Arc::clone(&channel));
        handle_channel_message(&rt, &message("telegram", "/ping")).await;
        assert_eq!(
            channel.sent(),
            vec![("@Alice pong".to_string(), "#rust".to_string())]
        );
    }

    #[tokio::test]
    async fn ping_ignored_when_commands_disabled() {
        let channel = RecordingChannel::new("irc", false);
        let rt = runtime(Arc::clone(&channel));
        handle_channel_message(&rt, &message("irc", "/ping")).await;
        assert!(channel.sent().is_empty());
    }

    #[tokio::test]
    async fn unknown_channel_is_dropped() {
        let channel = RecordingChannel::new("irc", true);
        let rt = runtime(Arc::clone(&channel));
        handle_channel_message(&rt, &message("matrix", "/ping")).await;
        assert!(channel.sent().is_empty());
    }
}
