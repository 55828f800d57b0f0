use super::parse::{IrcMessage, is_channel_name};
use crate::channels::traits::{ChannelMessage, unix_now};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter to ensure unique message IDs under burst traffic.
static MSG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Largest random suffix tried when our nickname is taken.
pub(super) const NICK_SUFFIX_MAX: u8 = 100;

const CTCP_DELIM: char = '\u{1}';

/// What the connection loop should do in response to a server line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum IrcAction {
    Send(String),
    Deliver(ChannelMessage),
}

/// Client-side protocol state for one IRC connection.
///
/// Socket-free: each server line goes through [`IrcSession::handle`] and
/// comes back as lines to write and messages to deliver.
#[derive(Debug)]
pub(super) struct IrcSession {
    base_nick: String,
    current_nick: String,
    channels: Vec<String>,
    registered: bool,
}

impl IrcSession {
    pub(super) fn new(nickname: &str, channels: &[String]) -> Self {
        Self {
            base_nick: nickname.to_string(),
            current_nick: nickname.to_string(),
            channels: channels.to_vec(),
            registered: false,
        }
    }

    pub(super) fn current_nick(&self) -> &str {
        &self.current_nick
    }

    /// Lines sent right after connecting.
    pub(super) fn registration(
        &self,
        username: &str,
        realname: &str,
        password: Option<&str>,
    ) -> Vec<String> {
        let mut lines = Vec::with_capacity(3);
        if let Some(pass) = password {
            lines.push(format!("PASS {pass}"));
        }
        lines.push(format!("NICK {}", self.current_nick));
        lines.push(format!("USER {username} 0 * :{realname}"));
        lines
    }

    pub(super) fn handle(&mut self, msg: &IrcMessage) -> anyhow::Result<Vec<IrcAction>> {
        let actions = match msg.command.as_str() {
            "PING" => vec![IrcAction::Send(format!(
                "PONG :{}",
                msg.param(0).unwrap_or_default()
            ))],
            // RPL_WELCOME
            "001" => self.on_register(msg),
            // ERR_NICKNAMEINUSE
            "433" => self.on_nickname_in_use(rand::random_range(0..=NICK_SUFFIX_MAX)),
            "NICK" => {
                self.on_nick_change(msg);
                Vec::new()
            }
            "PRIVMSG" => self
                .on_channel_message(msg)
                .map(IrcAction::Deliver)
                .into_iter()
                .collect(),
            // ERR_PASSWDMISMATCH
            "464" => anyhow::bail!("IRC password mismatch"),
            "ERROR" => anyhow::bail!(
                "IRC server closed the link: {}",
                msg.param(0).unwrap_or("no reason given")
            ),
            _ => Vec::new(),
        };
        Ok(actions)
    }

    fn on_register(&mut self, msg: &IrcMessage) -> Vec<IrcAction> {
        self.registered = true;
        if let Some(nick) = msg.param(0) {
            self.current_nick = nick.to_string();
        }
        tracing::info!("IRC registered as {}", self.current_nick);

        self.channels
            .iter()
            .map(|chan| IrcAction::Send(format!("JOIN {chan}")))
            .collect()
    }

    /// Ask for `<nick><suffix>` instead.
    ///
    /// The new name is not checked; if it is also taken the server sends
    /// another 433 and a fresh suffix is drawn.
    pub(super) fn on_nickname_in_use(&mut self, suffix: u8) -> Vec<IrcAction> {
        let alt = format!("{}{suffix}", self.base_nick);
        tracing::warn!("IRC nickname {} is in use, trying {alt}", self.current_nick);
        if !self.registered {
            self.current_nick.clone_from(&alt);
        }
        vec![IrcAction::Send(format!("NICK {alt}"))]
    }

    fn on_nick_change(&mut self, msg: &IrcMessage) {
        let Some(old) = msg.nick() else { return };
        if !old.eq_ignore_ascii_case(&self.current_nick) {
            return;
        }
        if let Some(new) = msg.param(0) {
            tracing::info!("IRC nickname changed from {old} to {new}");
            self.current_nick = new.to_string();
        }
    }

    fn on_channel_message(&self, msg: &IrcMessage) -> Option<ChannelMessage> {
        if !self.registered {
            return None;
        }

        let target = msg.param(0)?;
        let text = msg.param(1)?;
        let sender = msg.nick()?;

        if !is_channel_name(target)
            || sender.eq_ignore_ascii_case(&self.current_nick)
            || sender.eq_ignore_ascii_case("NickServ")
            || sender.eq_ignore_ascii_case("ChanServ")
        {
            return None;
        }

        let content = strip_ctcp_action(text)?;

        let seq = MSG_SEQ.fetch_add(1, Ordering::Relaxed);
        Some(ChannelMessage {
            id: format!("irc_{}_{seq}", chrono::Utc::now().timestamp_millis()),
            channel: "irc".to_string(),
            reply_target: target.to_string(),
            sender: sender.to_string(),
            content: content.to_string(),
            timestamp: unix_now(),
        })
    }
}

/// `\x01ACTION text\x01` → `text`; other CTCP requests → `None`.
fn strip_ctcp_action(text: &str) -> Option<&str> {
    let Some(inner) = text.strip_prefix(CTCP_DELIM) else {
        return Some(text);
    };
    let inner = inner.strip_suffix(CTCP_DELIM).unwrap_or(inner);
    inner.strip_prefix("ACTION ")
}
