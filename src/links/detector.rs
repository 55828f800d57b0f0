use regex::Regex;
use std::sync::OnceLock;

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").expect("URL regex is valid"))
}

/// Return the first `http://` or `https://` URL in `text`, verbatim.
///
/// The match runs up to the next whitespace character; nothing else is
/// validated, so a malformed match is left for the fetcher to reject.
pub fn first_url(text: &str) -> Option<&str> {
    url_pattern().find(text).map(|m| m.as_str())
}

/// All HTTP/HTTPS URLs in `text`, in order of appearance.
pub fn detect_urls(text: &str) -> Vec<&str> {
    url_pattern().find_iter(text).map(|m| m.as_str()).collect()
}
