use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Laura.
///
/// Startup and transport code surfaces these; the per-message title pipeline
/// reports [`TitleError`] which the dispatcher logs and drops.
#[derive(Debug, Error)]
pub enum LauraError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Transport / Channel ─────────────────────────────────────────────
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("access token not defined (set LAURA_ACCESS_TOKEN)")]
    MissingAccessToken,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Transport errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("channel {channel} connection failed: {message}")]
    Connection { channel: String, message: String },

    #[error("channel {channel} send failed: {message}")]
    Send { channel: String, message: String },

    #[error("webhook: {0}")]
    Webhook(String),
}

// ─── Title pipeline errors ──────────────────────────────────────────────────

/// Why a message produced no title reply. None of these reach the chat.
#[derive(Debug, Error)]
pub enum TitleError {
    #[error("no http(s) url in message")]
    NoUrl,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("not an html document (content-type: {})", .0.as_deref().unwrap_or("<missing>"))]
    ContentType(Option<String>),

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("document has no <title>")]
    NoTitle,

    #[error("title is empty after trimming")]
    EmptyTitle,
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, LauraError>;
