use laura::error::TitleError;
use laura::links::{LinkConfig, TitleResolver};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn resolver() -> TitleResolver {
    TitleResolver::new(LinkConfig::default()).unwrap()
}

#[tokio::test]
async fn hello_world_title() {
    let server = serve(
        "/page",
        html("<html><head><title>Hello World</title></head></html>"),
    )
    .await;

    let title = resolver()
        .title_for_message(&format!("look at {}/page please", server.uri()))
        .await
        .unwrap();
    assert_eq!(title, "Hello World");
}

#[tokio::test]
async fn title_is_trimmed() {
    let server = serve(
        "/",
        html("<title>\n   Rust Programming Language \t\n</title>"),
    )
    .await;

    let title = resolver().title_for_url(&server.uri()).await.unwrap();
    assert_eq!(title, "Rust Programming Language");
}

#[tokio::test]
async fn slow_server_hits_the_timeout() {
    let server = serve(
        "/slow",
        html("<title>Slow</title>").set_delay(Duration::from_secs(5)),
    )
    .await;
    let resolver = TitleResolver::new(LinkConfig {
        timeout_secs: 1,
        ..LinkConfig::default()
    })
    .unwrap();

    let started = Instant::now();
    let err = resolver
        .title_for_url(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, TitleError::Http(_)), "{err:?}");
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn not_found_is_rejected() {
    let server = serve("/gone", ResponseTemplate::new(404).set_body_string("<title>Nope</title>")).await;

    let err = resolver()
        .title_for_url(&format!("{}/gone", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, TitleError::Status(404)));
}

#[tokio::test]
async fn json_is_not_html() {
    let server = serve(
        "/api",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"title": "no"})),
    )
    .await;

    let err = resolver()
        .title_for_url(&format!("{}/api", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, TitleError::ContentType(Some(_))));
}

#[tokio::test]
async fn content_type_match_is_case_sensitive() {
    let server = serve(
        "/",
        ResponseTemplate::new(200)
            .set_body_raw(b"<title>Shouty</title>".to_vec(), "Text/HTML"),
    )
    .await;

    let err = resolver().title_for_url(&server.uri()).await.unwrap_err();
    assert!(matches!(err, TitleError::ContentType(_)));
}

#[tokio::test]
async fn whitespace_title_is_rejected() {
    let server = serve("/", html("<html><title>   \n </title></html>")).await;

    let err = resolver().title_for_url(&server.uri()).await.unwrap_err();
    assert!(matches!(err, TitleError::EmptyTitle));
}

#[tokio::test]
async fn page_without_title_is_rejected() {
    let server = serve("/", html("<html><body><h1>Heading</h1></body></html>")).await;

    let err = resolver().title_for_url(&server.uri()).await.unwrap_err();
    assert!(matches!(err, TitleError::NoTitle));
}

#[tokio::test]
async fn title_past_the_character_cap_is_not_seen() {
    let body = format!(
        "<html><body>{}</body><title>Too Late</title></html>",
        "a".repeat(1_000_050)
    );
    let server = serve("/big", html(&body)).await;

    let err = resolver()
        .title_for_url(&format!("{}/big", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, TitleError::NoTitle));
}

#[tokio::test]
async fn title_inside_the_cap_survives_truncation() {
    let body = format!(
        "<html><head><title>Early</title></head><body>{}</body></html>",
        "b".repeat(1_500_000)
    );
    let server = serve("/big", html(&body)).await;

    let title = resolver()
        .title_for_url(&format!("{}/big", server.uri()))
        .await
        .unwrap();
    assert_eq!(title, "Early");
}

#[tokio::test]
async fn repeated_lookups_agree() {
    let server = serve("/", html("<title>Stable</title>")).await;
    let resolver = resolver();
    let url = server.uri();

    let first = resolver.title_for_url(&url).await.unwrap();
    let second = resolver.title_for_url(&url).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn message_without_url() {
    let err = resolver()
        .title_for_message("no links here, just ftp://example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, TitleError::NoUrl));
}

#[tokio::test]
async fn only_the_first_url_is_tried_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html("<title>Second</title>"))
        .mount(&server)
        .await;
    let text = format!("{0}/missing and {0}/ok", server.uri());

    let err = resolver().title_for_message(&text).await.unwrap_err();
    assert!(matches!(err, TitleError::Status(404)));

    let all = TitleResolver::new(LinkConfig {
        try_all_urls: true,
        ..LinkConfig::default()
    })
    .unwrap();
    assert_eq!(all.title_for_message(&text).await.unwrap(), "Second");
}

#[tokio::test]
async fn redirects_are_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/short"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/final"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(html("<title>Landed</title>"))
        .mount(&server)
        .await;

    let title = resolver()
        .title_for_url(&format!("{}/short", server.uri()))
        .await
        .unwrap();
    assert_eq!(title, "Landed");
}
