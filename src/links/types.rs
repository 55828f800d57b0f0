use serde::{Deserialize, Serialize};

/// Upper bound on the decoded characters read from a page before parsing.
pub const DEFAULT_MAX_BODY_CHARS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Stop reading the response body once this many characters are buffered.
    pub max_body_chars: usize,
    /// Whole-request timeout (connect, headers and body).
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Try every URL in a message until one yields a title, instead of only the first.
    pub try_all_urls: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
            timeout_secs: 10,
            max_redirects: 10,
            user_agent: concat!("laura/", env!("CARGO_PKG_VERSION")).to_string(),
            try_all_urls: false,
        }
    }
}

/// A fetched HTML document, truncated to the configured character cap.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub content_type: String,
    pub body: String,
    pub truncated: bool,
}
