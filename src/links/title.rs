use crate::error::TitleError;
use scraper::{Html, Selector};

/// Text content of the first `<title>` element, untrimmed.
///
/// html5ever recovers from any input, so truncated or broken markup simply
/// yields `None` when no title survived.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let element = document.select(&selector).next()?;
    let text: String = element.text().collect();
    if text.is_empty() { None } else { Some(text) }
}

/// Trim surrounding whitespace; an empty result counts as no title.
pub fn normalize_title(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extract and normalize in one step.
pub fn title_from_html(html: &str) -> Result<String, TitleError> {
    let raw = extract_title(html).ok_or(TitleError::NoTitle)?;
    normalize_title(&raw)
        .map(str::to_string)
        .ok_or(TitleError::EmptyTitle)
}
