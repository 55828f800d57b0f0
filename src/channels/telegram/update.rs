use crate::channels::traits::{ChannelMessage, unix_now};
use serde_json::Value;
use uuid::Uuid;

/// Turn a Bot API `Update` into a channel message.
///
/// Only text messages are relayed; the reply goes back to the same chat and
/// the sender is named by first name, then username.
pub(super) fn parse_update(update: &Value) -> Option<ChannelMessage> {
    let message = update.get("message")?;
    let text = message.get("text").and_then(Value::as_str)?;

    let chat_id = message
        .get("chat")
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64)?;

    let from = message.get("from");
    let sender = from
        .and_then(|f| f.get("first_name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .or_else(|| {
            from.and_then(|f| f.get("username"))
                .and_then(Value::as_str)
        })
        .unwrap_or("unknown");

    let timestamp = message
        .get("date")
        .and_then(Value::as_u64)
        .unwrap_or_else(unix_now);

    Some(ChannelMessage {
        id: Uuid::new_v4().to_string(),
        channel: "telegram".to_string(),
        reply_target: chat_id.to_string(),
        sender: sender.to_string(),
        content: text.to_string(),
        timestamp,
    })
}

pub(super) fn update_id(update: &Value) -> Option<i64> {
    update.get("update_id").and_then(Value::as_i64)
}
