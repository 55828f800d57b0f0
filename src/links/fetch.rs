use super::types::{FetchedPage, LinkConfig};
use crate::error::TitleError;
use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Build the HTTP client shared by every title lookup.
///
/// `timeout` covers the whole exchange including the body stream, so a
/// slow or endless response cannot stall the message loop.
pub fn build_client(config: &LinkConfig) -> reqwest::Result<reqwest::Client> {
    let timeout = Duration::from_secs(config.timeout_secs);
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(config.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
}

/// Case-sensitive prefix match on the raw `Content-Type` value.
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type.starts_with("text/html")
}

/// GET `url` and read at most `max_chars` characters of an HTML body.
///
/// Anything other than `200 OK` with a `text/html` content type is rejected
/// before the body is touched.
pub async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
    max_chars: usize,
) -> Result<FetchedPage, TitleError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(TitleError::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let content_type = match content_type {
        Some(ct) if is_html_content_type(&ct) => ct,
        other => return Err(TitleError::ContentType(other)),
    };

    let mut body = TextAccumulator::new(max_chars);
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        if body.push(&chunk?) {
            break;
        }
    }
    // Dropping the stream here closes the connection on early exit.
    drop(stream);

    let truncated = body.is_full();
    Ok(FetchedPage {
        url: url.to_string(),
        content_type,
        body: body.finish(),
        truncated,
    })
}

/// Incremental UTF-8 decoder with a hard character limit.
///
/// Chunks may split a multi-byte sequence; the incomplete tail is held back
/// until the next chunk. Invalid sequences become U+FFFD.
pub(super) struct TextAccumulator {
    text: String,
    chars: usize,
    limit: usize,
    pending: Vec<u8>,
}

impl TextAccumulator {
    pub(super) fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            chars: 0,
            limit,
            pending: Vec::new(),
        }
    }

    pub(super) fn is_full(&self) -> bool {
        self.chars >= self.limit
    }

    /// Feed raw bytes. Returns `true` once the limit has been reached.
    pub(super) fn push(&mut self, bytes: &[u8]) -> bool {
        let mut pending = std::mem::take(&mut self.pending);
        pending.extend_from_slice(bytes);

        let mut rest: &[u8] = &pending;
        while !rest.is_empty() && !self.is_full() {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    self.append(valid);
                    rest = &[];
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        self.append(valid);
                    }
                    match err.error_len() {
                        Some(len) => {
                            self.append("\u{FFFD}");
                            rest = &after[len..];
                        }
                        // Sequence cut by the chunk boundary
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.pending = if self.is_full() {
            Vec::new()
        } else {
            rest.to_vec()
        };
        self.is_full()
    }

    fn append(&mut self, s: &str) {
        let room = self.limit.saturating_sub(self.chars);
        if room == 0 {
            return;
        }
        match s.char_indices().nth(room) {
            Some((idx, _)) => {
                self.text.push_str(&s[..idx]);
                self.chars = self.limit;
            }
            None => {
                self.chars += s.chars().count();
                self.text.push_str(s);
            }
        }
    }

    pub(super) fn finish(mut self) -> String {
        if !self.pending.is_empty() {
            self.pending.clear();
            self.append("\u{FFFD}");
        }
        self.text
    }
}
