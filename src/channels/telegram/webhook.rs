use super::TelegramChannel;
use super::update::parse_update;
use crate::channels::traits::ChannelMessage;
use crate::config::WebhookConfig;
use crate::error::TransportError;
use anyhow::Context;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

pub(super) const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";
const MAX_BODY_SIZE: usize = 1_048_576;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
struct WebhookState {
    tx: mpsc::Sender<ChannelMessage>,
    secret: Option<Arc<str>>,
}

/// Constant-time equality comparison for secret strings.
fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn secret_matches(headers: &HeaderMap, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    headers
        .get(SECRET_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|got| constant_time_eq(got, expected))
}

async fn handle_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !secret_matches(&headers, state.secret.as_deref()) {
        tracing::warn!("Telegram webhook: rejected update with bad secret token");
        return StatusCode::UNAUTHORIZED;
    }

    let update: Value = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(error) => {
            tracing::debug!(%error, "Telegram webhook: malformed update");
            return StatusCode::BAD_REQUEST;
        }
    };

    if let Some(msg) = parse_update(&update)
        && state.tx.send(msg).await.is_err()
    {
        return StatusCode::SERVICE_UNAVAILABLE;
    }

    StatusCode::OK
}

fn build_app(tx: mpsc::Sender<ChannelMessage>, secret: Option<Arc<str>>) -> Router {
    Router::new()
        .route("/", post(handle_update))
        .with_state(WebhookState { tx, secret })
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Serve webhook updates on an already bound listener until the queue closes.
pub(super) async fn serve_webhook(
    listener: tokio::net::TcpListener,
    tx: mpsc::Sender<ChannelMessage>,
    secret: Option<Arc<str>>,
) -> anyhow::Result<()> {
    let closed = tx.clone();
    axum::serve(listener, build_app(tx, secret))
        .with_graceful_shutdown(async move { closed.closed().await })
        .await
        .context("serve Telegram webhook")?;
    Ok(())
}

/// Register the webhook URL (when configured) and serve updates.
pub(super) async fn run_webhook(
    channel: &TelegramChannel,
    config: &WebhookConfig,
    tx: mpsc::Sender<ChannelMessage>,
) -> anyhow::Result<()> {
    if let Some(url) = &config.url {
        let mut body = json!({
            "url": url,
            "allowed_updates": ["message"],
        });
        if let Some(secret) = &config.secret_token {
            body["secret_token"] = json!(secret);
        }
        channel.call("setWebhook", &body).await?;
        tracing::info!(%url, "Telegram webhook registered");
    } else {
        tracing::info!("No webhook URL configured; expecting an existing registration");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TransportError::Webhook(format!("bind {addr}: {e}")))?;
    tracing::info!("Telegram webhook listening on {addr}");

    let secret = config.secret_token.as_deref().map(Arc::from);
    serve_webhook(listener, tx, secret).await
}
