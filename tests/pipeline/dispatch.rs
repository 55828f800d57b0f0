use crate::recording_channel::RecordingChannel;
use laura::channels::{Channel, ChannelRuntime, handle_channel_message};
use laura::links::{LinkConfig, TitleResolver};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runtime(channels: Vec<Arc<dyn Channel>>) -> ChannelRuntime {
    ChannelRuntime {
        channels,
        resolver: TitleResolver::new(LinkConfig::default()).unwrap(),
    }
}

async fn example_site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<title>Example Domain</title>", "text/html; charset=UTF-8"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn title_goes_back_to_the_originating_channel() {
    let server = example_site().await;
    let irc = Arc::new(RecordingChannel::new("irc", false));
    let telegram = Arc::new(RecordingChannel::new("telegram", true));
    let rt = runtime(vec![
        Arc::clone(&irc) as Arc<dyn Channel>,
        Arc::clone(&telegram) as Arc<dyn Channel>,
    ]);

    let msg = irc.message("#rust", "alice", &format!("{}/ is neat", server.uri()));
    handle_channel_message(&rt, &msg).await;

    assert_eq!(
        irc.sent(),
        vec![("#rust".to_string(), "Example Domain".to_string())]
    );
    assert!(telegram.sent().is_empty());
}

#[tokio::test]
async fn failures_stay_silent() {
    let server = example_site().await;
    let irc = Arc::new(RecordingChannel::new("irc", false));
    let rt = runtime(vec![Arc::clone(&irc) as Arc<dyn Channel>]);

    for content in [
        "just chatting".to_string(),
        format!("{}/data.json", server.uri()),
        format!("{}/missing", server.uri()),
        "http://127.0.0.1:9/unreachable".to_string(),
    ] {
        handle_channel_message(&rt, &irc.message("#rust", "bob", &content)).await;
    }

    assert!(irc.sent().is_empty());
}

#[tokio::test]
async fn ping_answers_with_first_name() {
    let telegram = Arc::new(RecordingChannel::new("telegram", true));
    let rt = runtime(vec![Arc::clone(&telegram) as Arc<dyn Channel>]);

    handle_channel_message(&rt, &telegram.message("-1001", "Alice", "/ping")).await;

    assert_eq!(
        telegram.sent(),
        vec![("-1001".to_string(), "@Alice pong".to_string())]
    );
}

#[tokio::test]
async fn ping_is_plain_text_on_irc() {
    let irc = Arc::new(RecordingChannel::new("irc", false));
    let rt = runtime(vec![Arc::clone(&irc) as Arc<dyn Channel>]);

    handle_channel_message(&rt, &irc.message("#rust", "alice", "/ping")).await;

    assert!(irc.sent().is_empty());
}
