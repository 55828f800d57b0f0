use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use super::health::{ChannelHealthState, classify_health_result};
use super::message_handler::{ChannelRuntime, handle_channel_message};
use super::runtime::{
    DEFAULT_CHANNEL_INITIAL_BACKOFF_SECS, DEFAULT_CHANNEL_MAX_BACKOFF_SECS,
    spawn_supervised_listener,
};
use super::traits::{Channel, ChannelMessage};

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const MESSAGE_QUEUE_CAPACITY: usize = 100;

/// Probe each channel once and print the outcome.
///
/// Fails if any channel is not healthy.
pub async fn doctor_channels(channels: &[Arc<dyn Channel>]) -> Result<()> {
    let mut failures = 0_u32;

    for channel in channels {
        let result = tokio::time::timeout(HEALTH_CHECK_TIMEOUT, channel.health_check()).await;
        let name = channel.name();
        match classify_health_result(&result) {
            ChannelHealthState::Healthy => println!("  ✓ {name:<9} healthy"),
            ChannelHealthState::Unhealthy => {
                failures += 1;
                println!("  ✗ {name:<9} unhealthy");
            }
            ChannelHealthState::Timeout => {
                failures += 1;
                println!("  ! {name:<9} timed out");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} channel(s) failed the health check");
    }
    Ok(())
}

/// Listen on every channel and handle messages one at a time until Ctrl-C.
pub async fn start_channels(rt: ChannelRuntime) -> Result<()> {
    if rt.channels.is_empty() {
        anyhow::bail!("no channels to start");
    }

    let names = rt
        .channels
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!(
        channels = %names,
        max_body_chars = rt.resolver.config().max_body_chars,
        timeout_secs = rt.resolver.config().timeout_secs,
        "Laura listening"
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<ChannelMessage>(MESSAGE_QUEUE_CAPACITY);

    let mut handles = Vec::with_capacity(rt.channels.len());
    for ch in &rt.channels {
        handles.push(spawn_supervised_listener(
            Arc::clone(ch),
            tx.clone(),
            DEFAULT_CHANNEL_INITIAL_BACKOFF_SECS,
            DEFAULT_CHANNEL_MAX_BACKOFF_SECS,
        ));
    }
    drop(tx);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            msg = rx.recv() => {
                let Some(msg) = msg else { break };
                tracing::debug!(
                    channel = %msg.channel,
                    sender = %msg.sender,
                    id = %msg.id,
                    "message received"
                );
                handle_channel_message(&rt, &msg).await;
            }
            signal = &mut shutdown => {
                signal.context("listen for shutdown signal")?;
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    for h in handles {
        h.abort();
    }

    Ok(())
}
