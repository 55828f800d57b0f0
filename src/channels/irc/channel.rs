use crate::channels::traits::{Channel, ChannelMessage};
use crate::config::IrcConfig;
use crate::error::TransportError;
use anyhow::Context;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc};

use tokio_rustls::rustls;

use super::message::{privmsg_payload_budget, split_message};
use super::parse::IrcMessage;
use super::session::{IrcAction, IrcSession};

/// No data for this long means the connection is dead; servers PING every
/// few minutes.
const READ_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(300);

type Reader = Box<dyn AsyncRead + Send + Unpin>;
type WriteHalf = Box<dyn AsyncWrite + Send + Unpin>;

fn not_connected() -> TransportError {
    TransportError::Connection {
        channel: "irc".into(),
        message: "not connected".into(),
    }
}

/// IRC channel, plain TCP or TLS.
///
/// Registers with the server, joins the configured channels and forwards
/// channel PRIVMSGs to the message loop. Private messages are ignored.
pub struct IrcChannel {
    pub(super) config: IrcConfig,
    /// Shared write half of the connection for sending messages.
    writer: Arc<Mutex<Option<WriteHalf>>>,
}

impl IrcChannel {
    pub fn new(config: IrcConfig) -> Self {
        Self {
            config,
            writer: Arc::new(Mutex::new(None)),
        }
    }

    fn username(&self) -> &str {
        self.config
            .username
            .as_deref()
            .unwrap_or(&self.config.nickname)
    }

    /// Open a connection to the IRC server, wrapped in TLS when enabled.
    async fn connect(&self) -> anyhow::Result<(Reader, WriteHalf)> {
        let addr = format!("{}:{}", self.config.server, self.config.port);
        let tcp = tokio::net::TcpStream::connect(&addr)
            .await
            .with_context(|| format!("connect to {addr}"))?;

        if !self.config.tls {
            let (reader, writer) = tcp.into_split();
            return Ok((Box::new(reader), Box::new(writer)));
        }

        let root_store: rustls::RootCertStore =
            webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let connector = tokio_rustls::TlsConnector::from(Arc::new(tls_config));
        let domain = rustls::pki_types::ServerName::try_from(self.config.server.clone())?;
        let tls = connector
            .connect(domain, tcp)
            .await
            .with_context(|| format!("TLS handshake with {addr}"))?;

        let (reader, writer) = tokio::io::split(tls);
        Ok((Box::new(reader), Box::new(writer)))
    }

    /// Send a raw IRC line (appends \r\n).
    async fn send_raw(writer: &mut WriteHalf, line: &str) -> anyhow::Result<()> {
        let data = format!("{line}\r\n");
        writer.write_all(data.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn send_shared(&self, line: &str) -> anyhow::Result<()> {
        let mut guard = self.writer.lock().await;
        let writer = guard
            .as_mut()
            .ok_or_else(not_connected)?;
        Self::send_raw(writer, line).await
    }

    async fn run_session(
        &self,
        reader: Reader,
        tx: &mpsc::Sender<ChannelMessage>,
    ) -> anyhow::Result<()> {
        let mut session = IrcSession::new(&self.config.nickname, &self.config.channels);
        for line in session.registration(
            self.username(),
            &self.config.realname,
            self.config.server_password.as_deref(),
        ) {
            self.send_shared(&line).await?;
        }

        let mut buf_reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            let n = tokio::time::timeout(READ_TIMEOUT, buf_reader.read_line(&mut line))
                .await
                .map_err(|_| {
                    anyhow::anyhow!("IRC read timed out (no data for {READ_TIMEOUT:?})")
                })??;
            if n == 0 {
                anyhow::bail!("IRC connection closed by server");
            }

            let Some(msg) = IrcMessage::parse(&line) else {
                continue;
            };

            for action in session.handle(&msg)? {
                match action {
                    IrcAction::Send(out) => self.send_shared(&out).await?,
                    IrcAction::Deliver(channel_msg) => {
                        if tx.send(channel_msg).await.is_err() {
                            tracing::debug!(nick = session.current_nick(), "IRC queue closed");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

impl Channel for IrcChannel {
    fn name(&self) -> &str {
        "irc"
    }

    fn max_message_length(&self) -> usize {
        400
    }

    fn send<'a>(
        &'a self,
        message: &'a str,
        recipient: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut guard = self.writer.lock().await;
            let writer = guard
                .as_mut()
                .ok_or_else(not_connected)?;

            let max_payload = privmsg_payload_budget(recipient).min(self.max_message_length());
            for chunk in split_message(message, max_payload) {
                Self::send_raw(writer, &format!("PRIVMSG {recipient} :{chunk}")).await?;
            }

            Ok(())
        })
    }

    fn listen<'a>(
        &'a self,
        tx: mpsc::Sender<ChannelMessage>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            tracing::info!(
                "IRC channel connecting to {}:{} as {}{}...",
                self.config.server,
                self.config.port,
                self.config.nickname,
                if self.config.tls { " (TLS)" } else { "" }
            );

            let (reader, writer) = self.connect().await?;
            *self.writer.lock().await = Some(writer);

            let result = self.run_session(reader, &tx).await;
            *self.writer.lock().await = None;
            result
        })
    }

    fn health_check<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        // Lightweight connectivity check: connect + QUIT
        Box::pin(async move {
            match self.connect().await {
                Ok((_, mut writer)) => {
                    let _ = Self::send_raw(&mut writer, "QUIT :health check").await;
                    true
                }
                Err(error) => {
                    tracing::debug!(%error, "IRC health check failed");
                    false
                }
            }
        })
    }
}
